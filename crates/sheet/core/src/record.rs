//! Persisted record schema.
//!
//! Records are what the backing store holds for each (owner, category, name).
//! The `type` field selects the variant:
//!
//! ```text
//! { name, min, max, type: "attribute", base, modifiers }
//! { name, min, max, type: "derived", formula, modifiers }
//! { name, type: "resource", min: <attribute>, max: <attribute>, current_value,
//!   recharge_rate, recharge_interval, will_recharge }
//! ```
//!
//! Entities convert to and from records with `to_record` / `from_record`.

use crate::error::{AttributeError, Result};
use crate::modifier::Modifier;

/// Stored-value attribute record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseRecord {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
}

/// Formula-backed attribute record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedRecord {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub formula: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
}

/// Either attribute variant; used wherever only attributes are valid
/// (handler parameters, resource bounds).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type")
)]
pub enum AttributeRecord {
    #[cfg_attr(feature = "serde", serde(rename = "attribute", alias = "base"))]
    Base(BaseRecord),
    #[cfg_attr(feature = "serde", serde(rename = "derived"))]
    Derived(DerivedRecord),
}

impl AttributeRecord {
    pub fn base(name: impl Into<String>, min: f64, max: f64, base: f64) -> Self {
        Self::Base(BaseRecord {
            name: name.into(),
            min,
            max,
            base,
            modifiers: Vec::new(),
        })
    }

    pub fn derived(name: impl Into<String>, min: f64, max: f64, formula: impl Into<String>) -> Self {
        Self::Derived(DerivedRecord {
            name: name.into(),
            min,
            max,
            formula: formula.into(),
            modifiers: Vec::new(),
        })
    }

    /// Attaches starting modifiers (builder pattern).
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        match &mut self {
            Self::Base(record) => record.modifiers.extend(modifiers),
            Self::Derived(record) => record.modifiers.extend(modifiers),
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Base(record) => &record.name,
            Self::Derived(record) => &record.name,
        }
    }
}

/// Depletable resource record; bounds are full attribute records.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceRecord {
    pub name: String,
    pub min: AttributeRecord,
    pub max: AttributeRecord,
    pub current_value: f64,
    pub recharge_rate: f64,
    /// Seconds between recharge ticks.
    pub recharge_interval: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub will_recharge: bool,
}

/// Any persisted entity, discriminated by `type`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type")
)]
pub enum Record {
    #[cfg_attr(feature = "serde", serde(rename = "attribute", alias = "base"))]
    Base(BaseRecord),
    #[cfg_attr(feature = "serde", serde(rename = "derived"))]
    Derived(DerivedRecord),
    #[cfg_attr(feature = "serde", serde(rename = "resource"))]
    Resource(ResourceRecord),
}

impl Record {
    pub fn name(&self) -> &str {
        match self {
            Self::Base(record) => &record.name,
            Self::Derived(record) => &record.name,
            Self::Resource(record) => &record.name,
        }
    }

    /// The persisted `type` discriminant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Base(_) => "attribute",
            Self::Derived(_) => "derived",
            Self::Resource(_) => "resource",
        }
    }

    pub fn into_attribute(self) -> Result<AttributeRecord> {
        match self {
            Self::Base(record) => Ok(AttributeRecord::Base(record)),
            Self::Derived(record) => Ok(AttributeRecord::Derived(record)),
            Self::Resource(record) => Err(AttributeError::InvalidRecord {
                name: record.name,
                reason: "expected an attribute record, found a resource".to_owned(),
            }),
        }
    }

    pub fn into_resource(self) -> Result<ResourceRecord> {
        match self {
            Self::Resource(record) => Ok(record),
            other => Err(AttributeError::InvalidRecord {
                name: other.name().to_owned(),
                reason: format!("expected a resource record, found '{}'", other.kind()),
            }),
        }
    }
}

impl From<AttributeRecord> for Record {
    fn from(record: AttributeRecord) -> Self {
        match record {
            AttributeRecord::Base(record) => Self::Base(record),
            AttributeRecord::Derived(record) => Self::Derived(record),
        }
    }
}

impl From<ResourceRecord> for Record {
    fn from(record: ResourceRecord) -> Self {
        Self::Resource(record)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::modifier::OriginRef;
    use serde_json::json;

    #[test]
    fn base_record_schema() {
        let record: Record = AttributeRecord::base("Agility", 0.0, 100.0, 10.0)
            .with_modifiers([Modifier::add("ring", 2.0).with_origin(OriginRef::new(9, "Item"))])
            .into();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "type": "attribute",
                "name": "Agility",
                "min": 0.0,
                "max": 100.0,
                "base": 10.0,
                "modifiers": [
                    { "desc": "ring", "val": 2.0, "operator": "+", "origin_ref": { "id": 9, "kind": "Item" } }
                ]
            })
        );
    }

    #[test]
    fn accepts_base_alias_and_integer_numbers() {
        let record: Record = serde_json::from_value(json!({
            "type": "base",
            "name": "Strength",
            "min": 0,
            "max": 100,
            "base": 12
        }))
        .unwrap();
        assert_eq!(
            record,
            Record::from(AttributeRecord::base("Strength", 0.0, 100.0, 12.0))
        );
    }

    #[test]
    fn resource_record_round_trips() {
        let record = Record::Resource(ResourceRecord {
            name: "health".into(),
            min: AttributeRecord::base("health_min", 0.0, 0.0, 0.0),
            max: AttributeRecord::derived("health_max", 1.0, 500.0, "Constitution * 10"),
            current_value: 80.0,
            recharge_rate: 5.0,
            recharge_interval: 60.0,
            will_recharge: true,
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "resource");
        assert_eq!(json["max"]["type"], "derived");
        assert_eq!(json["max"]["formula"], "Constitution * 10");

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn into_attribute_rejects_resources() {
        let record = Record::Resource(ResourceRecord {
            name: "mana".into(),
            min: AttributeRecord::base("mana_min", 0.0, 0.0, 0.0),
            max: AttributeRecord::base("mana_max", 0.0, 50.0, 50.0),
            current_value: 0.0,
            recharge_rate: 1.0,
            recharge_interval: 10.0,
            will_recharge: false,
        });
        assert!(matches!(
            record.into_attribute(),
            Err(AttributeError::InvalidRecord { name, .. }) if name == "mana"
        ));
    }
}
