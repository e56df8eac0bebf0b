//! The settings container: one logical settings domain.
//!
//! A container owns an unnamed group plus an ordered list of named groups,
//! aggregates every property for lookup by name, and carries the
//! string-map helpers that connect persistent properties to an external
//! storage layer. Containers are built once during initialization and then
//! live for the process lifetime; properties are never removed, only
//! deactivated.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::error::SettingsError;
use crate::settings::controller::LazyPropertyRef;
use crate::settings::group::{NamedSettingsGroup, SettingsGroup};
use crate::settings::property::AnyProperty;

pub(crate) struct ContainerInner {
    unnamed: SettingsGroup,
    named: RefCell<Vec<Rc<NamedSettingsGroup>>>,
}

impl ContainerInner {
    /// All properties: named groups in declaration order (each group's
    /// properties in add order), then the unnamed group.
    pub(crate) fn all_properties(&self) -> Vec<Rc<dyn AnyProperty>> {
        let mut properties = Vec::new();
        for group in self.named.borrow().iter() {
            properties.extend(group.properties());
        }
        properties.extend(self.unnamed.properties());
        properties
    }

    /// Linear search by name; assumes names are unique (enforced by
    /// [`SettingsContainer::validate`]).
    pub(crate) fn find(&self, name: &str) -> Option<Rc<dyn AnyProperty>> {
        self.all_properties()
            .into_iter()
            .find(|property| property.name() == name)
    }
}

/// Aggregate of all settings groups for one logical settings domain.
///
/// The handle is cheap to clone; clones share the same groups and
/// properties.
#[derive(Clone)]
pub struct SettingsContainer {
    inner: Rc<ContainerInner>,
}

impl SettingsContainer {
    pub fn new() -> Self {
        SettingsContainer {
            inner: Rc::new(ContainerInner {
                unnamed: SettingsGroup::new(),
                named: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Creates a named group, appends it to the container, and runs the
    /// builder block against it. The group is registered before the block
    /// runs, so lazy name lookups from inside the block can already see
    /// properties declared earlier in the same group.
    pub fn group(
        &self,
        name: impl Into<String>,
        init: impl FnOnce(&SettingsGroup),
    ) -> Rc<NamedSettingsGroup> {
        let group = Rc::new(NamedSettingsGroup::new(name));
        self.inner.named.borrow_mut().push(Rc::clone(&group));
        init(&group);
        group
    }

    /// Runs a builder block against the container's unnamed group.
    pub fn unnamed_group(&self, init: impl FnOnce(&SettingsGroup)) {
        init(&self.inner.unnamed);
    }

    pub fn named_groups(&self) -> Vec<Rc<NamedSettingsGroup>> {
        self.inner.named.borrow().clone()
    }

    pub fn all_properties(&self) -> Vec<Rc<dyn AnyProperty>> {
        self.inner.all_properties()
    }

    pub fn find(&self, name: &str) -> Option<Rc<dyn AnyProperty>> {
        self.inner.find(name)
    }

    /// A lazy reference to the property with the given name, resolved on
    /// first use. Lets controllers reference properties that are declared
    /// later in the container.
    pub fn with_name(&self, name: impl Into<String>) -> LazyPropertyRef {
        LazyPropertyRef::named(Rc::downgrade(&self.inner), name)
    }

    /// Checks the container for declaration errors: duplicate property
    /// names, and controller references to properties that do not exist.
    /// Concrete containers call this at the end of construction so that
    /// declaration mistakes abort startup instead of surfacing mid-run.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let properties = self.all_properties();
        let mut seen = HashSet::new();
        for property in &properties {
            if !seen.insert(property.name().to_owned()) {
                return Err(SettingsError::DuplicateProperty {
                    name: property.name().to_owned(),
                });
            }
        }
        for property in &properties {
            if let Some(controller) = property.as_controller() {
                controller.resolve_controlled()?;
            }
        }
        Ok(())
    }

    /// Serialized form of every persistent property, keyed by property
    /// name. The external storage layer decides the file format.
    pub fn persistent_snapshot(&self) -> BTreeMap<String, String> {
        self.all_properties()
            .iter()
            .filter_map(|property| {
                property
                    .as_persistent()
                    .map(|persistent| (property.name().to_owned(), persistent.backing_string()))
            })
            .collect()
    }

    /// Restores persistent properties from a previously taken snapshot.
    /// Properties absent from the snapshot keep their current value; keys
    /// without a matching property are ignored (they may belong to a newer
    /// or older declaration of the container).
    pub fn restore_persistent(&self, snapshot: &BTreeMap<String, String>) {
        for property in self.all_properties() {
            if let Some(persistent) = property.as_persistent() {
                if let Some(raw) = snapshot.get(property.name()) {
                    persistent.restore_backing_string(raw);
                }
            }
        }
    }
}

impl Default for SettingsContainer {
    fn default() -> Self {
        Self::new()
    }
}
