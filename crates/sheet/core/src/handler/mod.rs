//! Per-owner registries with a lazily populated cache.
//!
//! A [`Handler`] owns every attribute (or resource) of one owner in one store
//! category. The cache starts [`CacheState::Empty`] and is filled with a single
//! `fetch_all` on the first operation; afterwards the store is only written,
//! never read, until [`Handler::invalidate`] drops the cache again.
//!
//! ```text
//!   Empty ──first access──▶ Populated ──invalidate()──▶ Empty
//! ```
//!
//! Every mutation follows the same sequence:
//! 1. mutate the cached entity
//! 2. notify the [`ChangeObserver`] with the re-serialized record
//! 3. if the notification fails, undo step 1 and return the store error
//!
//! so the cache never holds a change the store has not accepted.

mod attributes;
mod resources;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::attribute::Attribute;
use crate::error::{AttributeError, Result};
use crate::observer::{ChangeEvent, ChangeObserver, StoreObserver};
use crate::record::Record;
use crate::resource::Resource;
use crate::store::{AttributeStore, OwnerId};

/// Handler over an owner's attributes.
pub type AttributeHandler = Handler<Attribute>;

/// Handler over an owner's resources.
pub type ResourceHandler = Handler<Resource>;

/// Something a [`Handler`] can cache and persist.
pub trait Entity: Clone + Send {
    /// Entity kind used in log output.
    const KIND: &'static str;

    fn entity_name(&self) -> &str;

    fn to_stored(&self) -> Record;

    fn from_stored(record: Record) -> Result<Self>;
}

impl Entity for Attribute {
    const KIND: &'static str = "attribute";

    fn entity_name(&self) -> &str {
        self.name()
    }

    fn to_stored(&self) -> Record {
        self.to_record().into()
    }

    fn from_stored(record: Record) -> Result<Self> {
        Attribute::from_record(record.into_attribute()?)
    }
}

impl Entity for Resource {
    const KIND: &'static str = "resource";

    fn entity_name(&self) -> &str {
        self.name()
    }

    fn to_stored(&self) -> Record {
        self.to_record().into()
    }

    fn from_stored(record: Record) -> Result<Self> {
        Resource::from_record(record.into_resource()?)
    }
}

/// Cache lifecycle.
#[derive(Clone, Debug, Default)]
pub enum CacheState<E> {
    #[default]
    Empty,
    Populated(BTreeMap<String, E>),
}

impl<E> CacheState<E> {
    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }
}

/// Name → entity registry for one owner and category.
pub struct Handler<E> {
    owner: OwnerId,
    category: String,
    store: Arc<dyn AttributeStore>,
    observer: Box<dyn ChangeObserver>,
    cache: CacheState<E>,
}

impl<E: Entity> Handler<E> {
    /// Creates a handler that writes changes back to `store`.
    pub fn new(owner: OwnerId, category: impl Into<String>, store: Arc<dyn AttributeStore>) -> Self {
        let category = category.into();
        let observer = StoreObserver::new(owner, category.clone(), Arc::clone(&store));
        Self {
            owner,
            category,
            store,
            observer: Box::new(observer),
            cache: CacheState::Empty,
        }
    }

    /// Replaces the change observer (builder pattern).
    #[must_use]
    pub fn with_observer(self, observer: impl ChangeObserver + 'static) -> Self {
        self.with_boxed_observer(Box::new(observer))
    }

    #[must_use]
    pub fn with_boxed_observer(mut self, observer: Box<dyn ChangeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn cache_state(&self) -> &CacheState<E> {
        &self.cache
    }

    /// Populates the cache from the store if it is still empty.
    pub(crate) fn ensure_loaded(&mut self) -> Result<&mut BTreeMap<String, E>> {
        match self.cache {
            CacheState::Populated(ref mut entries) => Ok(entries),
            CacheState::Empty => {
                self.cache = CacheState::Populated(self.load()?);
                self.ensure_loaded()
            }
        }
    }

    fn load(&self) -> Result<BTreeMap<String, E>> {
        let records = self.store.fetch_all(self.owner, &self.category)?;
        let mut entries = BTreeMap::new();
        for record in records {
            let entity = E::from_stored(record)?;
            entries.insert(entity.entity_name().to_owned(), entity);
        }
        tracing::debug!(
            owner = %self.owner,
            category = %self.category,
            count = entries.len(),
            "populated {} cache",
            E::KIND
        );
        Ok(entries)
    }

    /// Drops the cache; the next access reloads everything from the store.
    pub fn invalidate(&mut self) {
        self.cache = CacheState::Empty;
    }

    pub fn get(&mut self, name: &str) -> Result<&E> {
        self.ensure_loaded()?
            .get(name)
            .ok_or_else(|| AttributeError::not_found(name))
    }

    /// Like [`Self::get`], but a missing entity is `None`.
    pub fn find(&mut self, name: &str) -> Result<Option<&E>> {
        Ok(self.ensure_loaded()?.get(name))
    }

    /// Like [`Self::get`], but a missing entity yields `default`.
    pub fn get_or<'a>(&'a mut self, name: &str, default: &'a E) -> Result<&'a E> {
        Ok(self.ensure_loaded()?.get(name).unwrap_or(default))
    }

    pub fn contains(&mut self, name: &str) -> Result<bool> {
        Ok(self.ensure_loaded()?.contains_key(name))
    }

    /// Every cached entity, ordered by name.
    pub fn all(&mut self) -> Result<Vec<&E>> {
        Ok(self.ensure_loaded()?.values().collect())
    }

    pub fn names(&mut self) -> Result<Vec<String>> {
        Ok(self.ensure_loaded()?.keys().cloned().collect())
    }

    pub fn len(&mut self) -> Result<usize> {
        Ok(self.ensure_loaded()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.ensure_loaded()?.is_empty())
    }

    /// Adds a new entity and notifies `Created`.
    ///
    /// Fails with `DuplicateAttribute` when the name is taken; the cache is
    /// left untouched.
    pub fn insert(&mut self, entity: E) -> Result<&E> {
        let name = entity.entity_name().to_owned();
        let entries = self.ensure_loaded()?;
        if entries.contains_key(&name) {
            return Err(AttributeError::DuplicateAttribute { name });
        }
        let record = entity.to_stored();
        entries.insert(name.clone(), entity);

        let event = ChangeEvent::Created {
            name: name.clone(),
            record,
        };
        if let Err(err) = self.observer.notify(event) {
            self.ensure_loaded()?.remove(&name);
            return Err(err.into());
        }
        tracing::debug!(owner = %self.owner, name = %name, "added {}", E::KIND);
        self.get(&name)
    }

    /// Removes an entity and notifies `Deleted`.
    pub fn remove(&mut self, name: &str) -> Result<E> {
        let removed = self
            .ensure_loaded()?
            .remove(name)
            .ok_or_else(|| AttributeError::not_found(name))?;

        let event = ChangeEvent::Deleted {
            name: name.to_owned(),
        };
        if let Err(err) = self.observer.notify(event) {
            self.ensure_loaded()?.insert(name.to_owned(), removed);
            return Err(err.into());
        }
        tracing::debug!(owner = %self.owner, name, "removed {}", E::KIND);
        Ok(removed)
    }

    /// Removes every entity, one `Deleted` notification each.
    ///
    /// Stops at the first failing notification; entities removed before it
    /// stay removed.
    pub fn clear(&mut self) -> Result<usize> {
        let names = self.names()?;
        for name in &names {
            self.remove(name)?;
        }
        Ok(names.len())
    }

    /// Read-modify-notify on one entity.
    ///
    /// `f` runs on the cached entity; if it fails, or the `Updated`
    /// notification fails, the entity is restored to its prior state.
    pub fn modify<R>(&mut self, name: &str, f: impl FnOnce(&mut E) -> Result<R>) -> Result<R> {
        let entity = self
            .ensure_loaded()?
            .get_mut(name)
            .ok_or_else(|| AttributeError::not_found(name))?;
        let snapshot = entity.clone();

        let output = match f(entity) {
            Ok(output) => output,
            Err(err) => {
                *entity = snapshot;
                return Err(err);
            }
        };

        let event = ChangeEvent::Updated {
            name: name.to_owned(),
            record: entity.to_stored(),
        };
        if let Err(err) = self.observer.notify(event) {
            if let Some(entity) = self.ensure_loaded()?.get_mut(name) {
                *entity = snapshot;
            }
            return Err(err.into());
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::observer::RecordingObserver;
    use crate::record::AttributeRecord;
    use crate::store::testing::MapStore;

    struct FailingObserver;

    impl ChangeObserver for FailingObserver {
        fn notify(&mut self, _event: ChangeEvent) -> std::result::Result<(), StoreError> {
            Err(StoreError::LockPoisoned)
        }
    }

    fn agility() -> Attribute {
        Attribute::base("Agility", 0.0, 100.0, 10.0).unwrap()
    }

    #[test]
    fn cache_populates_once() {
        let store = Arc::new(MapStore::default());
        store.seed(OwnerId(1), "attributes", AttributeRecord::base("Luck", 0.0, 10.0, 3.0));

        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", store.clone());
        assert!(!handler.cache_state().is_populated());

        assert_eq!(handler.get("Luck").unwrap().base_value(), Some(3.0));
        assert!(handler.contains("Luck").unwrap());
        assert_eq!(handler.len().unwrap(), 1);
        assert_eq!(store.fetch_count(), 1);

        handler.invalidate();
        handler.names().unwrap();
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        use crate::record::ResourceRecord;

        let store = Arc::new(MapStore::default());
        store.seed(OwnerId(1), "attributes", AttributeRecord::base("Luck", 0.0, 10.0, 3.0));
        store.seed(
            OwnerId(1),
            "attributes",
            ResourceRecord {
                name: "stray".into(),
                min: AttributeRecord::base("stray_min", 0.0, 0.0, 0.0),
                max: AttributeRecord::base("stray_max", 0.0, 5.0, 5.0),
                current_value: 1.0,
                recharge_rate: 0.0,
                recharge_interval: 10.0,
                will_recharge: false,
            },
        );

        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", store.clone());
        assert!(matches!(
            handler.get("Luck"),
            Err(AttributeError::InvalidRecord { .. })
        ));
        assert!(!handler.cache_state().is_populated());

        store.delete(OwnerId(1), "attributes", "stray").unwrap();
        assert_eq!(handler.get("Luck").unwrap().base_value(), Some(3.0));
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn duplicate_insert_leaves_cache_untouched() {
        let recorder = RecordingObserver::new();
        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", Arc::new(MapStore::default()))
            .with_observer(recorder.clone());

        handler.insert(agility()).unwrap();
        let err = handler
            .insert(Attribute::base("Agility", 0.0, 50.0, 40.0).unwrap())
            .unwrap_err();

        assert!(matches!(err, AttributeError::DuplicateAttribute { name } if name == "Agility"));
        assert_eq!(handler.get("Agility").unwrap().max(), 100.0);
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn insert_then_remove_restores_all() {
        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", Arc::new(MapStore::default()));
        handler
            .insert(Attribute::base("Luck", 0.0, 10.0, 3.0).unwrap())
            .unwrap();
        let before: Vec<Attribute> = handler.all().unwrap().into_iter().cloned().collect();

        handler.insert(agility()).unwrap();
        handler.remove("Agility").unwrap();

        let after: Vec<Attribute> = handler.all().unwrap().into_iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_names_are_not_found() {
        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", Arc::new(MapStore::default()));
        assert!(matches!(
            handler.get("Ghost"),
            Err(AttributeError::AttributeNotFound { .. })
        ));
        assert!(matches!(
            handler.remove("Ghost"),
            Err(AttributeError::AttributeNotFound { .. })
        ));
        assert!(handler.find("Ghost").unwrap().is_none());

        let fallback = agility();
        assert_eq!(handler.get_or("Ghost", &fallback).unwrap().name(), "Agility");
    }

    #[test]
    fn clear_emits_one_delete_each() {
        let recorder = RecordingObserver::new();
        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", Arc::new(MapStore::default()))
            .with_observer(recorder.clone());
        handler.insert(agility()).unwrap();
        handler
            .insert(Attribute::base("Luck", 0.0, 10.0, 3.0).unwrap())
            .unwrap();
        recorder.take();

        assert_eq!(handler.clear().unwrap(), 2);
        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, ChangeEvent::Deleted { .. })));
        assert!(handler.is_empty().unwrap());
    }

    #[test]
    fn failed_notification_rolls_back() {
        let store = Arc::new(MapStore::default());
        store.seed(OwnerId(1), "attributes", AttributeRecord::base("Agility", 0.0, 100.0, 10.0));
        let mut handler =
            AttributeHandler::new(OwnerId(1), "attributes", store).with_observer(FailingObserver);

        assert!(matches!(
            handler.insert(Attribute::base("Luck", 0.0, 10.0, 3.0).unwrap()),
            Err(AttributeError::Store(StoreError::LockPoisoned))
        ));
        assert!(!handler.contains("Luck").unwrap());

        assert!(handler.set_base("Agility", 50.0).is_err());
        assert_eq!(handler.get("Agility").unwrap().base_value(), Some(10.0));

        assert!(handler.remove("Agility").is_err());
        assert!(handler.contains("Agility").unwrap());
    }

    #[test]
    fn failed_mutation_restores_entity() {
        let mut handler = AttributeHandler::new(OwnerId(1), "attributes", Arc::new(MapStore::default()));
        handler.insert(agility()).unwrap();

        let result: Result<()> = handler.modify("Agility", |attr| {
            attr.set_base(99.0)?;
            Err(AttributeError::not_found("Dexterity"))
        });
        assert!(result.is_err());
        assert_eq!(handler.get("Agility").unwrap().base_value(), Some(10.0));
    }
}
