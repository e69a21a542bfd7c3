//! One owner's complete sheet: attributes plus resources.
//!
//! Resource bounds are attributes that may reference the owner's other
//! attributes, so resource operations need both handlers at once.
//! [`CharacterSheet`] keeps them side by side and passes the attribute cache
//! as the lookup for every resource operation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::attribute::Attribute;
use crate::config::SheetConfig;
use crate::error::Result;
use crate::formula::FormulaRegistry;
use crate::handler::{AttributeHandler, ResourceHandler};
use crate::modifier::{Modifier, OriginRef};
use crate::observer::ChangeObserver;
use crate::record::{AttributeRecord, ResourceRecord};
use crate::resource::Resource;
use crate::store::{AttributeStore, OwnerId};

pub struct CharacterSheet {
    owner: OwnerId,
    config: SheetConfig,
    registry: FormulaRegistry,
    attributes: AttributeHandler,
    resources: ResourceHandler,
}

/// Builder for [`CharacterSheet`].
pub struct CharacterSheetBuilder {
    owner: OwnerId,
    store: Arc<dyn AttributeStore>,
    config: SheetConfig,
    registry: FormulaRegistry,
    attribute_observer: Option<Box<dyn ChangeObserver>>,
    resource_observer: Option<Box<dyn ChangeObserver>>,
}

impl CharacterSheetBuilder {
    pub fn config(mut self, config: SheetConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: FormulaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Observes attribute changes instead of writing them to the store.
    pub fn attribute_observer(mut self, observer: impl ChangeObserver + 'static) -> Self {
        self.attribute_observer = Some(Box::new(observer));
        self
    }

    /// Observes resource changes instead of writing them to the store.
    pub fn resource_observer(mut self, observer: impl ChangeObserver + 'static) -> Self {
        self.resource_observer = Some(Box::new(observer));
        self
    }

    pub fn build(self) -> CharacterSheet {
        let mut attributes = AttributeHandler::new(
            self.owner,
            self.config.attributes_category.clone(),
            Arc::clone(&self.store),
        );
        if let Some(observer) = self.attribute_observer {
            attributes = attributes.with_boxed_observer(observer);
        }

        let mut resources = ResourceHandler::new(
            self.owner,
            self.config.resources_category.clone(),
            self.store,
        );
        if let Some(observer) = self.resource_observer {
            resources = resources.with_boxed_observer(observer);
        }

        CharacterSheet {
            owner: self.owner,
            config: self.config,
            registry: self.registry,
            attributes,
            resources,
        }
    }
}

impl CharacterSheet {
    pub fn builder(owner: OwnerId, store: Arc<dyn AttributeStore>) -> CharacterSheetBuilder {
        CharacterSheetBuilder {
            owner,
            store,
            config: SheetConfig::default(),
            registry: FormulaRegistry::default(),
            attribute_observer: None,
            resource_observer: None,
        }
    }

    /// Sheet with default configuration and an empty registry.
    pub fn new(owner: OwnerId, store: Arc<dyn AttributeStore>) -> Self {
        Self::builder(owner, store).build()
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    /// Direct handler access. Prefer the sheet's own mutators, which keep
    /// resources inside their bounds.
    pub fn attributes(&mut self) -> &mut AttributeHandler {
        &mut self.attributes
    }

    pub fn resources(&mut self) -> &mut ResourceHandler {
        &mut self.resources
    }

    /// Attribute cache alongside the resource handler.
    fn split(&mut self) -> Result<(&BTreeMap<String, Attribute>, &mut ResourceHandler)> {
        let lookup = self.attributes.lookup()?;
        Ok((lookup, &mut self.resources))
    }

    /// Drops both caches.
    pub fn invalidate(&mut self) {
        self.attributes.invalidate();
        self.resources.invalidate();
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    pub fn add_attribute(&mut self, record: AttributeRecord) -> Result<&Attribute> {
        self.attributes.add(record)
    }

    /// Adds an attribute declared in the sheet's formula registry.
    pub fn add_registered(&mut self, name: &str, min: f64, max: f64, base: f64) -> Result<&Attribute> {
        self.attributes
            .add_registered(&self.registry, name, min, max, base)
    }

    pub fn value(&mut self, name: &str) -> Result<f64> {
        self.attributes.value(name)
    }

    // Attribute mutations below may move resource bounds, so each one
    // re-clamps resources before returning.

    pub fn set_base(&mut self, name: &str, value: f64) -> Result<f64> {
        let stored = self.attributes.set_base(name, value)?;
        self.reclamp_resources()?;
        Ok(stored)
    }

    pub fn add_modifier(&mut self, name: &str, modifier: Modifier) -> Result<()> {
        self.attributes.add_modifier(name, modifier)?;
        self.reclamp_resources()
    }

    pub fn remove_modifier(&mut self, name: &str, modifier: &Modifier) -> Result<Modifier> {
        let removed = self.attributes.remove_modifier(name, modifier)?;
        self.reclamp_resources()?;
        Ok(removed)
    }

    /// Drops every attribute modifier contributed by `origin`.
    pub fn remove_modifiers_from(&mut self, origin: &OriginRef) -> Result<usize> {
        let removed = self.attributes.remove_modifiers_from(origin)?;
        if removed > 0 {
            self.reclamp_resources()?;
        }
        Ok(removed)
    }

    /// Removes an attribute. Fails, leaving the attribute in place, when a
    /// resource bound still needs it.
    pub fn remove_attribute(&mut self, name: &str) -> Result<Attribute> {
        let removed = self.attributes.remove(name)?;
        if let Err(err) = self.reclamp_resources() {
            self.attributes.insert(removed)?;
            return Err(err);
        }
        Ok(removed)
    }

    // ========================================================================
    // Resources
    // ========================================================================

    pub fn add_resource(&mut self, record: ResourceRecord) -> Result<&Resource> {
        let (lookup, resources) = self.split()?;
        resources.add(record, lookup)
    }

    /// Reads a resource, first pulling every resource back inside its bounds
    /// in case attributes were changed through [`Self::attributes`].
    pub fn resource(&mut self, name: &str) -> Result<&Resource> {
        self.reclamp_resources()?;
        self.resources.get(name)
    }

    pub fn effective_max(&mut self, name: &str) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.get(name)?.effective_max(lookup)
    }

    pub fn effective_min(&mut self, name: &str) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.get(name)?.effective_min(lookup)
    }

    pub fn restore(&mut self, name: &str) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.restore(name, lookup)
    }

    pub fn deplete(&mut self, name: &str) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.deplete(name, lookup)
    }

    pub fn recharge(&mut self, name: &str) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.recharge(name, lookup)
    }

    pub fn recharge_if_enabled(&mut self, name: &str) -> Result<Option<f64>> {
        let (lookup, resources) = self.split()?;
        resources.recharge_if_enabled(name, lookup)
    }

    pub fn set_current(&mut self, name: &str, value: f64) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.set_current(name, value, lookup)
    }

    pub fn consume(&mut self, name: &str, amount: f64) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.consume(name, amount, lookup)
    }

    pub fn replenish(&mut self, name: &str, amount: f64) -> Result<f64> {
        let (lookup, resources) = self.split()?;
        resources.replenish(name, amount, lookup)
    }

    pub fn percentage(&mut self, name: &str) -> Result<f64> {
        self.reclamp_resources()?;
        let (lookup, resources) = self.split()?;
        resources.percentage(name, lookup)
    }

    pub fn toggle_recharge(&mut self, name: &str, enabled: bool) -> Result<bool> {
        self.resources.toggle_recharge(name, enabled)
    }

    /// Re-clamps every resource after attribute changes moved its bounds.
    pub fn reclamp_resources(&mut self) -> Result<()> {
        let (lookup, resources) = self.split()?;
        for name in resources.names()? {
            let resource = resources.get(&name)?;
            let current = resource.current_value();
            if current < resource.effective_min(lookup)? || current > resource.effective_max(lookup)? {
                resources.set_current(&name, current, lookup)?;
            }
        }
        Ok(())
    }
}
