use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use sheet_core::{AttributeStore, OwnerId, Record, StoreError};

use super::RepositoryError;

type Category = BTreeMap<String, Record>;

/// In-memory implementation of [`AttributeStore`].
#[derive(Debug, Default)]
pub struct InMemoryAttributeStore {
    records: RwLock<HashMap<(OwnerId, String), Category>>,
}

impl InMemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held for one owner and category.
    pub fn count(&self, owner: OwnerId, category: &str) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .get(&(owner, category.to_owned()))
            .map_or(0, BTreeMap::len))
    }
}

impl AttributeStore for InMemoryAttributeStore {
    fn lookup(&self, owner: OwnerId, category: &str, name: &str) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .get(&(owner, category.to_owned()))
            .and_then(|entries| entries.get(name))
            .cloned())
    }

    fn fetch_all(&self, owner: OwnerId, category: &str) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .get(&(owner, category.to_owned()))
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    fn upsert(
        &self,
        owner: OwnerId,
        category: &str,
        name: &str,
        record: &Record,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        records
            .entry((owner, category.to_owned()))
            .or_default()
            .insert(name.to_owned(), record.clone());
        Ok(())
    }

    fn delete(&self, owner: OwnerId, category: &str, name: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        records
            .get_mut(&(owner, category.to_owned()))
            .and_then(|entries| entries.remove(name))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                owner: owner.to_string(),
                category: category.to_owned(),
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::AttributeRecord;

    #[test]
    fn categories_and_owners_are_isolated() {
        let store = InMemoryAttributeStore::new();
        let record: Record = AttributeRecord::base("Luck", 0.0, 10.0, 4.0).into();

        store.upsert(OwnerId(1), "attributes", "Luck", &record).unwrap();
        assert_eq!(store.count(OwnerId(1), "attributes").unwrap(), 1);
        assert_eq!(store.count(OwnerId(1), "resources").unwrap(), 0);
        assert!(store.fetch_all(OwnerId(2), "attributes").unwrap().is_empty());
        assert_eq!(
            store.lookup(OwnerId(1), "attributes", "Luck").unwrap(),
            Some(record)
        );
    }

    #[test]
    fn deleting_missing_record_is_not_found() {
        let store = InMemoryAttributeStore::new();
        assert!(matches!(
            store.delete(OwnerId(1), "attributes", "Ghost"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
