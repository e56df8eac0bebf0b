//! Enable/disable dependency propagation.
//!
//! A controller attaches a predicate over one controlling property's value
//! to a set of controlled properties; every value change pushes
//! `predicate(value)` into the controlled properties' `active` flags. The
//! push is one level deep: controllers do not chain transitively through
//! other controllers' `active` state.
//!
//! Controlled properties may be referenced lazily by name, so a controller
//! can be declared before its targets exist in the container.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use once_cell::unsync::OnceCell;

use crate::error::SettingsError;
use crate::settings::binding::FieldBinding;
use crate::settings::container::ContainerInner;
use crate::settings::observable::ListenerId;
use crate::settings::property::{
    AnyProperty, PersistentProperty, PropertyListener, SimplePersistentValueProperty,
    SimpleValueProperty, ValueProperty,
};
use crate::settings::transformer::{read_or, transformer_of};

/// Erased controller capability, used by container validation to force
/// every lazy reference before the container is put into service.
pub trait AnyController {
    /// Resolves all controlled references without propagating. Fails on the
    /// first unknown name, signaling a declaration error.
    fn resolve_controlled(&self) -> Result<(), SettingsError>;
}

/// Reference to a property that may be resolved later.
///
/// Direct references are already resolved; named references perform a
/// linear lookup over the container's properties on first use and cache the
/// result. A failed lookup is a declaration error
/// ([`SettingsError::UnknownProperty`]) and should be surfaced during
/// container construction via
/// [`SettingsContainer::validate`](crate::settings::SettingsContainer::validate).
pub struct LazyPropertyRef {
    source: LazySource,
    resolved: OnceCell<Rc<dyn AnyProperty>>,
}

enum LazySource {
    Direct(Rc<dyn AnyProperty>),
    Named {
        container: Weak<ContainerInner>,
        name: String,
    },
}

impl LazyPropertyRef {
    pub fn direct(property: Rc<dyn AnyProperty>) -> Self {
        LazyPropertyRef {
            source: LazySource::Direct(property),
            resolved: OnceCell::new(),
        }
    }

    pub(crate) fn named(container: Weak<ContainerInner>, name: impl Into<String>) -> Self {
        LazyPropertyRef {
            source: LazySource::Named {
                container,
                name: name.into(),
            },
            resolved: OnceCell::new(),
        }
    }

    pub fn resolve(&self) -> Result<Rc<dyn AnyProperty>, SettingsError> {
        self.resolved
            .get_or_try_init(|| match &self.source {
                LazySource::Direct(property) => Ok(Rc::clone(property)),
                LazySource::Named { container, name } => {
                    let container =
                        container
                            .upgrade()
                            .ok_or_else(|| SettingsError::ContainerDropped {
                                name: name.clone(),
                            })?;
                    container
                        .find(name)
                        .ok_or_else(|| SettingsError::UnknownProperty { name: name.clone() })
                }
            })
            .map(Rc::clone)
    }
}

impl From<Rc<dyn AnyProperty>> for LazyPropertyRef {
    fn from(property: Rc<dyn AnyProperty>) -> Self {
        LazyPropertyRef::direct(property)
    }
}

/// Predicate over a controlling property's value plus the set of controlled
/// property references.
pub struct PropertyController<T> {
    predicate: RefCell<Rc<dyn Fn(&T) -> bool>>,
    controlled: RefCell<Vec<LazyPropertyRef>>,
}

impl<T: 'static> PropertyController<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + 'static) -> Self {
        PropertyController {
            predicate: RefCell::new(Rc::new(predicate)),
            controlled: RefCell::new(Vec::new()),
        }
    }

    /// Registers a property whose `active` flag this controller drives.
    pub fn control(&self, target: impl Into<LazyPropertyRef>) {
        self.controlled.borrow_mut().push(target.into());
    }

    /// Logically negates the predicate in place. Applying twice restores
    /// the original semantics.
    pub fn invert(&self) {
        let previous = Rc::clone(&self.predicate.borrow());
        *self.predicate.borrow_mut() = Rc::new(move |value: &T| !previous(value));
    }

    /// Re-evaluates the predicate for `value` and pushes the result into
    /// every controlled property's `active` flag.
    pub fn propagate(&self, value: &T) -> Result<(), SettingsError> {
        let predicate = Rc::clone(&self.predicate.borrow());
        let active = predicate(value);
        for target in self.controlled.borrow().iter() {
            target.resolve()?.set_active(active);
        }
        Ok(())
    }

    pub fn resolve_controlled(&self) -> Result<(), SettingsError> {
        for target in self.controlled.borrow().iter() {
            target.resolve()?;
        }
        Ok(())
    }
}

fn log_propagation_failure(name: &str, err: &SettingsError) {
    // Reaching this means validate() was skipped; the declaration error is
    // reported instead of aborting the value write.
    log::error!("controller on property '{}' failed to propagate: {}", name, err);
}

/// Boolean property that doubles as a controller over other properties.
/// The default predicate is the value itself.
pub struct SimpleBooleanProperty {
    delegate: SimpleValueProperty<bool>,
    controller: PropertyController<bool>,
}

impl SimpleBooleanProperty {
    pub fn new(description: Option<&str>, binding: FieldBinding<bool>) -> Self {
        SimpleBooleanProperty {
            delegate: SimpleValueProperty::new(description, binding),
            controller: PropertyController::new(|value: &bool| *value),
        }
    }

    pub fn control(&self, target: impl Into<LazyPropertyRef>) {
        self.controller.control(target);
    }

    pub fn invert(&self) {
        self.controller.invert();
    }

    pub fn controller(&self) -> &PropertyController<bool> {
        &self.controller
    }
}

impl AnyProperty for SimpleBooleanProperty {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn description(&self) -> &str {
        self.delegate.description()
    }

    fn is_active(&self) -> bool {
        self.delegate.is_active()
    }

    fn set_active(&self, active: bool) {
        self.delegate.set_active(active);
    }

    fn add_listener(&self, listener: PropertyListener) -> ListenerId {
        self.delegate.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.delegate.remove_listener(id)
    }

    fn as_controller(&self) -> Option<&dyn AnyController> {
        Some(self)
    }
}

impl ValueProperty<bool> for SimpleBooleanProperty {
    fn get(&self) -> bool {
        self.delegate.get()
    }

    fn set(&self, value: bool) {
        self.delegate.set(value);
        if let Err(err) = self.controller.propagate(&value) {
            log_propagation_failure(self.name(), &err);
        }
    }
}

impl AnyController for SimpleBooleanProperty {
    fn resolve_controlled(&self) -> Result<(), SettingsError> {
        self.controller.resolve_controlled()
    }
}

/// Persistent (string-backed) boolean property that doubles as a
/// controller. The backing form is `"true"`/`"false"`; anything that fails
/// to parse reads as `false`.
pub struct SimplePersistentBooleanProperty {
    delegate: SimplePersistentValueProperty<bool>,
    controller: PropertyController<bool>,
}

impl SimplePersistentBooleanProperty {
    pub fn new(description: Option<&str>, binding: FieldBinding<String>) -> Self {
        SimplePersistentBooleanProperty {
            delegate: SimplePersistentValueProperty::new(
                SimpleValueProperty::new(description, binding),
                transformer_of(
                    |value: &bool| Some(value.to_string()),
                    read_or(|raw: &String| raw.parse().ok(), false),
                ),
            ),
            controller: PropertyController::new(|value: &bool| *value),
        }
    }

    pub fn control(&self, target: impl Into<LazyPropertyRef>) {
        self.controller.control(target);
    }

    pub fn invert(&self) {
        self.controller.invert();
    }

    pub fn controller(&self) -> &PropertyController<bool> {
        &self.controller
    }

    fn propagate_current(&self) {
        let value = self.delegate.get();
        if let Err(err) = self.controller.propagate(&value) {
            log_propagation_failure(self.name(), &err);
        }
    }
}

impl AnyProperty for SimplePersistentBooleanProperty {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn description(&self) -> &str {
        self.delegate.description()
    }

    fn is_active(&self) -> bool {
        self.delegate.is_active()
    }

    fn set_active(&self, active: bool) {
        self.delegate.set_active(active);
    }

    fn add_listener(&self, listener: PropertyListener) -> ListenerId {
        self.delegate.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.delegate.remove_listener(id)
    }

    fn as_persistent(&self) -> Option<&dyn PersistentProperty> {
        Some(self)
    }

    fn as_controller(&self) -> Option<&dyn AnyController> {
        Some(self)
    }
}

impl ValueProperty<bool> for SimplePersistentBooleanProperty {
    fn get(&self) -> bool {
        self.delegate.get()
    }

    fn set(&self, value: bool) {
        self.delegate.set(value);
        if let Err(err) = self.controller.propagate(&value) {
            log_propagation_failure(self.name(), &err);
        }
    }
}

impl PersistentProperty for SimplePersistentBooleanProperty {
    fn backing_string(&self) -> String {
        self.delegate.backing_string()
    }

    /// Restoring a persisted flag re-derives the dependents' `active`
    /// state, exactly as a direct write would.
    fn restore_backing_string(&self, raw: &str) {
        self.delegate.restore_backing_string(raw);
        self.propagate_current();
    }
}

impl AnyController for SimplePersistentBooleanProperty {
    fn resolve_controlled(&self) -> Result<(), SettingsError> {
        self.controller.resolve_controlled()
    }
}
