//! Resources: bounded, depletable quantities.
//!
//! A resource (health, mana, stamina) keeps a current value between two
//! attributes. The bounds are full attributes, so they can be derived from the
//! owner's stats and carry their own modifiers:
//!
//! ```text
//! effective_min(lookup) <= current <= effective_max(lookup)
//! ```
//!
//! Bounds that reference other attributes are evaluated through the owner's
//! [`AttributeLookup`], which is why most operations take one. Periodic
//! recharge is driven from outside (see [`crate::timer`]); the resource only
//! records whether it wants to be recharged.

use std::time::Duration;

use crate::attribute::{Attribute, clamp};
use crate::error::{AttributeError, Result};
use crate::formula::AttributeLookup;
use crate::modifier::{Modifier, ModifierFilter};
use crate::record::ResourceRecord;

/// Selects one of the two bound attributes of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Bound {
    Min,
    Max,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    name: String,
    current: f64,
    min: Attribute,
    max: Attribute,
    recharge_rate: f64,
    recharge_interval: Duration,
    will_recharge: bool,
}

/// Converts a recharge interval in seconds, rejecting anything a timer cannot
/// run: non-positive, sub-nanosecond, or longer than
/// [`Resource::MAX_RECHARGE_INTERVAL`].
pub(crate) fn recharge_duration(name: &str, seconds: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(interval) if !interval.is_zero() && interval <= Resource::MAX_RECHARGE_INTERVAL => {
            Ok(interval)
        }
        _ => Err(AttributeError::InvalidRecord {
            name: name.to_owned(),
            reason: format!(
                "recharge interval {seconds}s must be between 1ns and {}s",
                Resource::MAX_RECHARGE_INTERVAL.as_secs()
            ),
        }),
    }
}

impl Resource {
    /// Longest accepted recharge interval (one year).
    pub const MAX_RECHARGE_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

    /// Builds a resource from its record.
    ///
    /// The stored current value is kept as is; call [`Self::reclamp`] once the
    /// owner's attributes are available.
    pub fn from_record(record: ResourceRecord) -> Result<Self> {
        let ResourceRecord {
            name,
            min,
            max,
            current_value,
            recharge_rate,
            recharge_interval,
            will_recharge,
        } = record;

        if !current_value.is_finite() {
            return Err(AttributeError::NonFiniteValue {
                name,
                value: current_value,
            });
        }
        if !recharge_rate.is_finite() {
            return Err(AttributeError::InvalidRecord {
                name,
                reason: format!("recharge rate {recharge_rate} is not finite"),
            });
        }
        let recharge_interval = recharge_duration(&name, recharge_interval)?;

        Ok(Self {
            min: Attribute::from_record(min)?,
            max: Attribute::from_record(max)?,
            name,
            current: current_value,
            recharge_rate,
            recharge_interval,
            will_recharge,
        })
    }

    pub fn to_record(&self) -> ResourceRecord {
        ResourceRecord {
            name: self.name.clone(),
            min: self.min.to_record(),
            max: self.max.to_record(),
            current_value: self.current,
            recharge_rate: self.recharge_rate,
            recharge_interval: self.recharge_interval.as_secs_f64(),
            will_recharge: self.will_recharge,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_value(&self) -> f64 {
        self.current
    }

    pub fn recharge_rate(&self) -> f64 {
        self.recharge_rate
    }

    pub fn recharge_interval(&self) -> Duration {
        self.recharge_interval
    }

    pub fn recharge_enabled(&self) -> bool {
        self.will_recharge
    }

    pub fn bound(&self, bound: Bound) -> &Attribute {
        match bound {
            Bound::Min => &self.min,
            Bound::Max => &self.max,
        }
    }

    fn bound_mut(&mut self, bound: Bound) -> &mut Attribute {
        match bound {
            Bound::Min => &mut self.min,
            Bound::Max => &mut self.max,
        }
    }

    pub fn effective_min(&self, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.min.effective_value(lookup)
    }

    pub fn effective_max(&self, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.max.effective_value(lookup)
    }

    /// Sets the current value, clamped to the effective bounds.
    pub fn set_current(&mut self, value: f64, lookup: &dyn AttributeLookup) -> Result<f64> {
        if value.is_nan() {
            return Err(AttributeError::NonFiniteValue {
                name: self.name.clone(),
                value,
            });
        }
        let min = self.effective_min(lookup)?;
        let max = self.effective_max(lookup)?;
        self.current = clamp(value, min, max);
        Ok(self.current)
    }

    /// Pulls the current value back inside the bounds after they moved.
    pub fn reclamp(&mut self, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.set_current(self.current, lookup)
    }

    /// Fills the resource to its effective maximum.
    pub fn restore(&mut self, lookup: &dyn AttributeLookup) -> Result<f64> {
        let max = self.effective_max(lookup)?;
        self.set_current(max, lookup)
    }

    /// Drains the resource to its effective minimum.
    pub fn deplete(&mut self, lookup: &dyn AttributeLookup) -> Result<f64> {
        let min = self.effective_min(lookup)?;
        self.set_current(min, lookup)
    }

    /// Adds one recharge step, never exceeding the effective maximum.
    pub fn recharge(&mut self, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.set_current(self.current + self.recharge_rate, lookup)
    }

    pub fn consume(&mut self, amount: f64, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.set_current(self.current - amount, lookup)
    }

    pub fn replenish(&mut self, amount: f64, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.set_current(self.current + amount, lookup)
    }

    /// `current / effective_max`.
    pub fn percentage(&self, lookup: &dyn AttributeLookup) -> Result<f64> {
        let max = self.effective_max(lookup)?;
        if max == 0.0 {
            return Err(AttributeError::division_by_zero(format!(
                "percentage of '{}' with max 0",
                self.name
            )));
        }
        Ok(self.current / max)
    }

    /// Records whether periodic recharge should run. Returns the previous flag.
    pub fn toggle_recharge(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.will_recharge, enabled)
    }

    /// Adds a modifier to one bound and re-clamps the current value.
    pub fn add_bound_modifier(
        &mut self,
        bound: Bound,
        modifier: Modifier,
        lookup: &dyn AttributeLookup,
    ) -> Result<f64> {
        self.bound_mut(bound).add_modifier(modifier);
        self.reclamp(lookup)
    }

    /// Removes a modifier from one bound and re-clamps the current value.
    pub fn remove_bound_modifier(
        &mut self,
        bound: Bound,
        modifier: &Modifier,
        lookup: &dyn AttributeLookup,
    ) -> Result<Modifier> {
        let removed = self.bound_mut(bound).remove_modifier(modifier)?;
        self.reclamp(lookup)?;
        Ok(removed)
    }

    pub fn get_bound_modifier(
        &self,
        bound: Bound,
        description: &str,
        filter: &ModifierFilter,
    ) -> Result<&Modifier> {
        self.bound(bound).get_modifier(description, filter)
    }
}
