//! Resource-specific handler operations.
//!
//! Resource bounds may be derived from the owner's attributes, so every
//! operation that reads a bound takes the owner's [`AttributeLookup`].

use super::ResourceHandler;
use crate::error::Result;
use crate::formula::AttributeLookup;
use crate::modifier::{Modifier, ModifierFilter};
use crate::record::ResourceRecord;
use crate::resource::{Bound, Resource};

impl ResourceHandler {
    /// Adds a resource, clamping its stored current value into its bounds.
    pub fn add(&mut self, record: ResourceRecord, lookup: &dyn AttributeLookup) -> Result<&Resource> {
        let mut resource = Resource::from_record(record)?;
        resource.reclamp(lookup)?;
        self.insert(resource)
    }

    pub fn current_value(&mut self, name: &str) -> Result<f64> {
        Ok(self.get(name)?.current_value())
    }

    pub fn percentage(&mut self, name: &str, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.get(name)?.percentage(lookup)
    }

    pub fn restore(&mut self, name: &str, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.modify(name, |resource| resource.restore(lookup))
    }

    pub fn deplete(&mut self, name: &str, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.modify(name, |resource| resource.deplete(lookup))
    }

    pub fn recharge(&mut self, name: &str, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.modify(name, |resource| resource.recharge(lookup))
    }

    /// One timer tick: recharges only while recharge is enabled.
    ///
    /// Returns `None` (and writes nothing) when recharge is off.
    pub fn recharge_if_enabled(
        &mut self,
        name: &str,
        lookup: &dyn AttributeLookup,
    ) -> Result<Option<f64>> {
        if !self.get(name)?.recharge_enabled() {
            return Ok(None);
        }
        self.recharge(name, lookup).map(Some)
    }

    pub fn set_current(&mut self, name: &str, value: f64, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.modify(name, |resource| resource.set_current(value, lookup))
    }

    pub fn consume(&mut self, name: &str, amount: f64, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.modify(name, |resource| resource.consume(amount, lookup))
    }

    pub fn replenish(&mut self, name: &str, amount: f64, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.modify(name, |resource| resource.replenish(amount, lookup))
    }

    /// Flips the recharge flag; returns the previous value.
    pub fn toggle_recharge(&mut self, name: &str, enabled: bool) -> Result<bool> {
        self.modify(name, |resource| Ok(resource.toggle_recharge(enabled)))
    }

    pub fn add_bound_modifier(
        &mut self,
        name: &str,
        bound: Bound,
        modifier: Modifier,
        lookup: &dyn AttributeLookup,
    ) -> Result<f64> {
        self.modify(name, |resource| {
            resource.add_bound_modifier(bound, modifier, lookup)
        })
    }

    pub fn remove_bound_modifier(
        &mut self,
        name: &str,
        bound: Bound,
        modifier: &Modifier,
        lookup: &dyn AttributeLookup,
    ) -> Result<Modifier> {
        self.modify(name, |resource| {
            resource.remove_bound_modifier(bound, modifier, lookup)
        })
    }

    pub fn get_bound_modifier(
        &mut self,
        name: &str,
        bound: Bound,
        description: &str,
        filter: &ModifierFilter,
    ) -> Result<Modifier> {
        self.get(name)?
            .get_bound_modifier(bound, description, filter)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::attribute::Attribute;
    use crate::error::AttributeError;
    use crate::formula::NoDependencies;
    use crate::observer::RecordingObserver;
    use crate::record::AttributeRecord;
    use crate::store::OwnerId;
    use crate::store::testing::MapStore;

    fn mana(current: f64, will_recharge: bool) -> ResourceRecord {
        ResourceRecord {
            name: "mana".into(),
            min: AttributeRecord::base("mana_min", 0.0, 0.0, 0.0),
            max: AttributeRecord::derived("mana_max", 0.0, 500.0, "Wisdom * 5"),
            current_value: current,
            recharge_rate: 4.0,
            recharge_interval: 10.0,
            will_recharge,
        }
    }

    fn wisdom() -> Vec<Attribute> {
        vec![Attribute::base("Wisdom", 0.0, 100.0, 10.0).unwrap()]
    }

    #[test]
    fn add_clamps_stored_current() {
        let mut handler = ResourceHandler::new(OwnerId(2), "resources", Arc::new(MapStore::default()));
        let resource = handler.add(mana(999.0, false), &wisdom()).unwrap();
        assert_eq!(resource.current_value(), 50.0);
    }

    #[test]
    fn disabled_recharge_is_a_no_op() {
        let recorder = RecordingObserver::new();
        let mut handler = ResourceHandler::new(OwnerId(2), "resources", Arc::new(MapStore::default()))
            .with_observer(recorder.clone());
        handler.add(mana(10.0, false), &wisdom()).unwrap();
        recorder.take();

        assert_eq!(handler.recharge_if_enabled("mana", &wisdom()).unwrap(), None);
        assert!(recorder.events().is_empty());

        handler.toggle_recharge("mana", true).unwrap();
        assert_eq!(
            handler.recharge_if_enabled("mana", &wisdom()).unwrap(),
            Some(14.0)
        );
        assert_eq!(recorder.events().len(), 2);
    }

    #[test]
    fn deplete_restore_cycle() {
        let mut handler = ResourceHandler::new(OwnerId(2), "resources", Arc::new(MapStore::default()));
        handler.add(mana(30.0, true), &wisdom()).unwrap();

        assert_eq!(handler.deplete("mana", &wisdom()).unwrap(), 0.0);
        assert_eq!(handler.restore("mana", &wisdom()).unwrap(), 50.0);
        assert_eq!(handler.percentage("mana", &wisdom()).unwrap(), 1.0);
        assert_eq!(handler.consume("mana", 20.0, &wisdom()).unwrap(), 30.0);
        assert_eq!(handler.replenish("mana", 5.0, &wisdom()).unwrap(), 35.0);
    }

    #[test]
    fn bound_modifier_shrinks_current() {
        let mut handler = ResourceHandler::new(OwnerId(2), "resources", Arc::new(MapStore::default()));
        handler.add(mana(50.0, false), &wisdom()).unwrap();

        let drain = Modifier::subtract("drain", 20.0);
        assert_eq!(
            handler
                .add_bound_modifier("mana", Bound::Max, drain.clone(), &wisdom())
                .unwrap(),
            30.0
        );
        assert_eq!(
            handler
                .get_bound_modifier("mana", Bound::Max, "drain", &ModifierFilter::new())
                .unwrap(),
            drain
        );
        handler
            .remove_bound_modifier("mana", Bound::Max, &drain, &wisdom())
            .unwrap();
        assert_eq!(handler.current_value("mana").unwrap(), 30.0);
    }

    #[test]
    fn missing_bound_dependency_leaves_resource_unchanged() {
        let mut handler = ResourceHandler::new(OwnerId(2), "resources", Arc::new(MapStore::default()));
        handler.add(mana(20.0, false), &wisdom()).unwrap();

        assert!(matches!(
            handler.restore("mana", &NoDependencies),
            Err(AttributeError::AttributeNotFound { .. })
        ));
        assert_eq!(handler.current_value("mana").unwrap(), 20.0);
    }
}
