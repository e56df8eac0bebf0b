//! Property kinds and the capability traits that compose them.
//!
//! Every property kind is built by delegation rather than inheritance:
//! [`SimpleValueProperty`] is the observable base, and each further
//! capability (transformation, persistence, choice restriction, controller
//! behavior) is a wrapper holding one inner instance and forwarding the
//! members it does not change. Capability discovery on an erased
//! `dyn AnyProperty` goes through explicit query methods instead of
//! downcasting.

use std::rc::Rc;

use crate::error::SettingsError;
use crate::settings::binding::FieldBinding;
use crate::settings::controller::AnyController;
use crate::settings::observable::{ListenerId, ListenerResult, ObservableValue, Observers};
use crate::settings::transformer::Transformer;

/// Listener over erased properties; the payload is the property that
/// changed (value or `active` flag).
pub type PropertyListener = Rc<dyn Fn(&(dyn AnyProperty + 'static)) -> ListenerResult>;

/// Type-erased view of a property: everything a container, controller, or
/// settings UI needs without knowing the value type.
///
/// The `as_*` methods are capability queries: a property kind that carries
/// the capability overrides the method to return itself, everything else
/// inherits the `None` default.
pub trait AnyProperty {
    /// Immutable name, derived from the bound field.
    fn name(&self) -> &str;

    /// Human-readable description; falls back to the field name when the
    /// declaration supplied none.
    fn description(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Flips the enabled/disabled state. Observers are notified only when
    /// the flag actually changes, so repeated controller pushes of the same
    /// result stay quiet.
    fn set_active(&self, active: bool);

    fn add_listener(&self, listener: PropertyListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId) -> bool;

    /// String-backed persistence view, for properties whose backing value is
    /// the serialized storage form.
    fn as_persistent(&self) -> Option<&dyn PersistentProperty> {
        None
    }

    /// Choice-restriction view, for properties constrained to an enumerated
    /// set of backing values.
    fn as_choice(&self) -> Option<&dyn ChoiceView> {
        None
    }

    /// Controller view, for properties that drive the `active` flag of
    /// other properties.
    fn as_controller(&self) -> Option<&dyn AnyController> {
        None
    }
}

impl std::fmt::Debug for dyn AnyProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyProperty")
            .field("name", &self.name())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Typed access to a property's exposed value.
pub trait ValueProperty<T>: AnyProperty {
    fn get(&self) -> T;
    fn set(&self, value: T);
}

/// Erased persistence capability: the backing value as the string an
/// external storage layer reads and writes. The framework defines no file
/// format; it only produces and consumes these strings.
pub trait PersistentProperty {
    /// Current backing value in its serialized string form.
    fn backing_string(&self) -> String;

    /// Reinstates a previously persisted string as the backing value.
    /// Implementations may substitute a configured fallback when the raw
    /// string is unacceptable (see the choice variants).
    fn restore_backing_string(&self, raw: &str);
}

/// Erased view of a choice-restricted property, sufficient for rendering a
/// selection widget.
pub trait ChoiceView {
    /// Display labels for every permissible backing value, in choice order.
    fn rendered_choices(&self) -> Vec<String>;

    /// Display label for the current backing value.
    fn rendered_value(&self) -> String;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores the backing value at `index` in the choice list.
    fn select(&self, index: usize) -> Result<(), SettingsError>;
}

/// Named, described, observable container of a typed value with an `active`
/// flag. The value itself lives behind the field binding; the property owns
/// no storage beyond what the accessors reach.
pub struct SimpleValueProperty<T> {
    name: String,
    description: String,
    binding: FieldBinding<T>,
    active: ObservableValue<bool>,
    observers: Observers<dyn AnyProperty>,
}

impl<T: Clone + 'static> SimpleValueProperty<T> {
    /// A missing description falls back to the bound field's name.
    pub fn new(description: Option<&str>, binding: FieldBinding<T>) -> Self {
        let name = binding.name().to_owned();
        let description = description.map_or_else(|| name.clone(), str::to_owned);
        SimpleValueProperty {
            name,
            description,
            binding,
            active: ObservableValue::new(true),
            observers: Observers::new(),
        }
    }

    pub(crate) fn notify(&self) {
        self.observers.notify(self);
    }
}

impl<T: Clone + 'static> AnyProperty for SimpleValueProperty<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn set_active(&self, active: bool) {
        if self.active.get() == active {
            return;
        }
        self.active.set(active);
        self.notify();
    }

    fn add_listener(&self, listener: PropertyListener) -> ListenerId {
        self.observers.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.observers.remove_listener(id)
    }
}

impl<T: Clone + 'static> ValueProperty<T> for SimpleValueProperty<T> {
    fn get(&self) -> T {
        self.binding.get()
    }

    fn set(&self, value: T) {
        self.binding.set(value);
        self.notify();
    }
}

/// A property whose exposed value of type `T` is computed from a separately
/// stored backing value of type `R` through a [`Transformer`].
///
/// There is no independently stored exposed value: reads transform the
/// backing value on the fly, and writes transform the exposed value back
/// into the backing slot. The invariant `get() == read(backing_value())`
/// therefore holds after every mutation.
pub struct SimpleTransformingValueProperty<R, T> {
    delegate: SimpleValueProperty<R>,
    transformer: Transformer<R, T>,
}

impl<R: Clone + 'static, T: Clone + 'static> SimpleTransformingValueProperty<R, T> {
    pub fn new(delegate: SimpleValueProperty<R>, transformer: Transformer<R, T>) -> Self {
        SimpleTransformingValueProperty { delegate, transformer }
    }

    pub fn backing_value(&self) -> R {
        self.delegate.get()
    }

    /// Stores a backing value directly, bypassing the write transform.
    pub fn set_backing_value(&self, backing: R) {
        self.delegate.set(backing);
    }

    /// The backing value substituted when a write transform fails, if one
    /// was configured on the transformer.
    pub fn write_fallback_value(&self) -> Option<&R> {
        self.transformer.fallback()
    }
}

impl<R: Clone + 'static, T: Clone + 'static> AnyProperty for SimpleTransformingValueProperty<R, T> {
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
}

impl<R: Clone + 'static, T: Clone + 'static> ValueProperty<T>
    for SimpleTransformingValueProperty<R, T>
{
    fn get(&self) -> T {
        self.transformer.read(&self.delegate.get())
    }

    /// Writes through the transformer. A failed write substitutes the
    /// transformer's fallback; without a fallback the backing value is left
    /// unchanged (never undefined, never an error).
    fn set(&self, value: T) {
        match self.transformer.write(&value) {
            Some(backing) => self.delegate.set(backing),
            None => match self.transformer.fallback() {
                Some(fallback) => {
                    log::debug!(
                        "write transform failed for property '{}', substituting fallback",
                        self.name()
                    );
                    self.delegate.set(fallback.clone());
                }
                None => log::debug!(
                    "write transform failed for property '{}' and no fallback is configured; \
                     backing value left unchanged",
                    self.name()
                ),
            },
        }
    }
}

/// A transforming property whose backing type is the persisted string form.
pub struct SimplePersistentValueProperty<T> {
    delegate: SimpleTransformingValueProperty<String, T>,
}

impl<T: Clone + 'static> SimplePersistentValueProperty<T> {
    pub fn new(delegate: SimpleValueProperty<String>, transformer: Transformer<String, T>) -> Self {
        SimplePersistentValueProperty {
            delegate: SimpleTransformingValueProperty::new(delegate, transformer),
        }
    }

    pub fn backing_value(&self) -> String {
        self.delegate.backing_value()
    }

    pub fn set_backing_value(&self, backing: String) {
        self.delegate.set_backing_value(backing);
    }
}

impl<T: Clone + 'static> AnyProperty for SimplePersistentValueProperty<T> {
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
}

impl<T: Clone + 'static> ValueProperty<T> for SimplePersistentValueProperty<T> {
    fn get(&self) -> T {
        self.delegate.get()
    }

    fn set(&self, value: T) {
        self.delegate.set(value);
    }
}

impl<T: Clone + 'static> PersistentProperty for SimplePersistentValueProperty<T> {
    fn backing_string(&self) -> String {
        self.delegate.backing_value()
    }

    fn restore_backing_string(&self, raw: &str) {
        self.delegate.set_backing_value(raw.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::bind_field;
    use crate::settings::transformer::{read_or, transformer_of};

    struct State {
        dark_gtk_theme: String,
        font_size: String,
    }

    fn state() -> Rc<RefCell<State>> {
        Rc::new(RefCell::new(State {
            dark_gtk_theme: String::from("Adwaita-dark"),
            font_size: String::from("11"),
        }))
    }

    fn font_size_property(state: &Rc<RefCell<State>>) -> SimpleTransformingValueProperty<String, i64> {
        SimpleTransformingValueProperty::new(
            SimpleValueProperty::new(None, bind_field!(state, font_size)),
            transformer_of(
                |value: &i64| Some(value.to_string()),
                read_or(|raw: &String| raw.parse().ok(), 10),
            ),
        )
    }

    #[test]
    fn description_falls_back_to_field_name() {
        let state = state();
        let described =
            SimpleValueProperty::new(Some("Dark GTK Theme"), bind_field!(state, dark_gtk_theme));
        let bare = SimpleValueProperty::new(None, bind_field!(state, dark_gtk_theme));

        assert_eq!(described.description(), "Dark GTK Theme");
        assert_eq!(bare.name(), "dark_gtk_theme");
        assert_eq!(bare.description(), "dark_gtk_theme");
    }

    #[test]
    fn set_writes_through_binding_and_notifies() {
        let state = state();
        let property = SimpleValueProperty::new(None, bind_field!(state, dark_gtk_theme));
        let notified = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&notified);
        property.add_listener(Rc::new(move |changed: &(dyn AnyProperty + 'static)| {
            sink.borrow_mut().push(changed.name().to_owned());
            Ok(())
        }));

        property.set(String::from("HighContrast"));
        assert_eq!(state.borrow().dark_gtk_theme, "HighContrast");
        assert_eq!(&*notified.borrow(), &[String::from("dark_gtk_theme")]);
    }

    #[test]
    fn set_active_notifies_only_on_change() {
        let state = state();
        let property = SimpleValueProperty::new(None, bind_field!(state, dark_gtk_theme));
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        property.add_listener(Rc::new(move |_: &(dyn AnyProperty + 'static)| {
            counter.set(counter.get() + 1);
            Ok(())
        }));

        property.set_active(true);
        assert_eq!(count.get(), 0);
        property.set_active(false);
        assert!(!property.is_active());
        assert_eq!(count.get(), 1);
        property.set_active(false);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn transforming_property_round_trips() {
        let state = state();
        let property = font_size_property(&state);

        property.set(13);
        assert_eq!(state.borrow().font_size, "13");
        assert_eq!(property.get(), 13);
        assert_eq!(property.backing_value(), "13");
    }

    #[test]
    fn exposed_value_tracks_backing_mutation() {
        let state = state();
        let property = font_size_property(&state);

        property.set_backing_value(String::from("9"));
        assert_eq!(property.get(), 9);

        // Unparseable backing degrades through the read fallback.
        property.set_backing_value(String::from("garbage"));
        assert_eq!(property.get(), 10);
    }

    #[test]
    fn failed_write_without_fallback_leaves_backing_unchanged() {
        let state = state();
        let property = SimpleTransformingValueProperty::new(
            SimpleValueProperty::new(None, bind_field!(state, font_size)),
            transformer_of(|_: &i64| None::<String>, read_or(|raw: &String| raw.parse().ok(), 0)),
        );

        property.set(42);
        assert_eq!(property.backing_value(), "11");
    }

    #[test]
    fn failed_write_with_fallback_substitutes_it() {
        let state = state();
        let property = SimpleTransformingValueProperty::new(
            SimpleValueProperty::new(None, bind_field!(state, font_size)),
            transformer_of(|_: &i64| None::<String>, read_or(|raw: &String| raw.parse().ok(), 0))
                .write_fallback(String::from("10")),
        );

        property.set(42);
        assert_eq!(property.backing_value(), "10");
    }

    #[test]
    fn persistent_property_exposes_backing_string() {
        let state = state();
        let property = SimplePersistentValueProperty::new(
            SimpleValueProperty::new(None, bind_field!(state, font_size)),
            transformer_of(
                |value: &i64| Some(value.to_string()),
                read_or(|raw: &String| raw.parse().ok(), 10),
            ),
        );

        property.set(14);
        let persistent = property.as_persistent().unwrap();
        assert_eq!(persistent.backing_string(), "14");

        persistent.restore_backing_string("15");
        assert_eq!(property.get(), 15);
        assert_eq!(state.borrow().font_size, "15");
    }
}
