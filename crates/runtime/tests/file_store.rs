use std::sync::Arc;

use sheet_core::{
    AttributeRecord, AttributeStore, CharacterSheet, Modifier, OriginRef, OwnerId, Record,
    ResourceRecord,
};
use sheet_runtime::FileAttributeStore;

#[test]
fn sheet_round_trips_through_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileAttributeStore::new(dir.path()).unwrap());

    {
        let mut sheet = CharacterSheet::new(OwnerId(42), store.clone());
        sheet
            .add_attribute(AttributeRecord::base("Dexterity", 0.0, 100.0, 14.0))
            .unwrap();
        sheet
            .add_attribute(AttributeRecord::derived("Armor", 0.0, 500.0, "(Dexterity * 5) + 100"))
            .unwrap();
        sheet
            .attributes()
            .add_modifier(
                "Armor",
                Modifier::add("shield", 20.0).with_origin(OriginRef::new(5, "Item")),
            )
            .unwrap();
        sheet
            .add_resource(ResourceRecord {
                name: "health".into(),
                min: AttributeRecord::base("health_min", 0.0, 0.0, 0.0),
                max: AttributeRecord::base("health_max", 0.0, 200.0, 200.0),
                current_value: 150.0,
                recharge_rate: 5.0,
                recharge_interval: 30.0,
                will_recharge: true,
            })
            .unwrap();
    }

    let document = std::fs::read_to_string(dir.path().join("owner_42/attributes.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(json["Armor"]["type"], "derived");
    assert_eq!(json["Armor"]["modifiers"][0]["desc"], "shield");
    assert_eq!(json["Armor"]["modifiers"][0]["operator"], "+");

    let mut reloaded = CharacterSheet::new(OwnerId(42), store.clone());
    assert_eq!(reloaded.value("Armor").unwrap(), 190.0);
    assert_eq!(reloaded.percentage("health").unwrap(), 0.75);

    reloaded.attributes().remove("Armor").unwrap();
    assert!(store.lookup(OwnerId(42), "attributes", "Armor").unwrap().is_none());
    assert!(matches!(
        store.lookup(OwnerId(42), "attributes", "Dexterity").unwrap(),
        Some(Record::Base(_))
    ));
}
