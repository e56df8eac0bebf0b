//! Property grouping and the declarative builder API.
//!
//! A group is an ordered, heterogeneous collection of properties; each
//! property keeps its static type at the declaration site and is erased to
//! `Rc<dyn AnyProperty>` for storage. The builder methods construct a
//! property variant, run the declaration's init closure against it (choices,
//! renderer, controller wiring), append the erased handle, and hand back the
//! typed `Rc` for callers that want to keep a reference.

use std::ops::Deref;
use std::cell::RefCell;
use std::rc::Rc;

use crate::settings::binding::FieldBinding;
use crate::settings::choice::{ChoiceProperty, PersistentChoiceProperty};
use crate::settings::controller::{SimpleBooleanProperty, SimplePersistentBooleanProperty};
use crate::settings::property::{
    AnyProperty, SimplePersistentValueProperty, SimpleTransformingValueProperty,
    SimpleValueProperty,
};
use crate::settings::transformer::{identity_transformer, Transformer};

/// Ordered collection of erased properties.
pub struct SettingsGroup {
    properties: RefCell<Vec<Rc<dyn AnyProperty>>>,
}

impl SettingsGroup {
    pub fn new() -> Self {
        SettingsGroup {
            properties: RefCell::new(Vec::new()),
        }
    }

    pub fn add(&self, property: Rc<dyn AnyProperty>) {
        self.properties.borrow_mut().push(property);
    }

    /// Snapshot of the group's properties in declaration order.
    pub fn properties(&self) -> Vec<Rc<dyn AnyProperty>> {
        self.properties.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }

    fn register<P: AnyProperty + 'static>(&self, property: P) -> Rc<P> {
        let property = Rc::new(property);
        let erased: Rc<dyn AnyProperty> = property.clone();
        self.add(erased);
        property
    }

    /// Plain observable property over a bound field.
    pub fn property<T: Clone + 'static>(
        &self,
        description: Option<&str>,
        binding: FieldBinding<T>,
        init: impl FnOnce(&mut SimpleValueProperty<T>),
    ) -> Rc<SimpleValueProperty<T>> {
        let mut property = SimpleValueProperty::new(description, binding);
        init(&mut property);
        self.register(property)
    }

    pub fn string_property(
        &self,
        description: Option<&str>,
        binding: FieldBinding<String>,
    ) -> Rc<SimpleValueProperty<String>> {
        self.property(description, binding, |_| {})
    }

    /// Boolean property that can control other properties' `active` state.
    pub fn boolean_property(
        &self,
        description: Option<&str>,
        binding: FieldBinding<bool>,
        init: impl FnOnce(&mut SimpleBooleanProperty),
    ) -> Rc<SimpleBooleanProperty> {
        let mut property = SimpleBooleanProperty::new(description, binding);
        init(&mut property);
        self.register(property)
    }

    /// Property whose exposed type differs from the bound backing type.
    pub fn transforming_property<R: Clone + 'static, T: Clone + 'static>(
        &self,
        description: Option<&str>,
        binding: FieldBinding<R>,
        transformer: Transformer<R, T>,
    ) -> Rc<SimpleTransformingValueProperty<R, T>> {
        self.register(SimpleTransformingValueProperty::new(
            SimpleValueProperty::new(description, binding),
            transformer,
        ))
    }

    /// Transforming property restricted to an enumerated set of backing
    /// values.
    pub fn choice_property<R, T>(
        &self,
        description: Option<&str>,
        binding: FieldBinding<R>,
        transformer: Transformer<R, T>,
        init: impl FnOnce(&mut ChoiceProperty<R, T>),
    ) -> Rc<ChoiceProperty<R, T>>
    where
        R: Clone + PartialEq + ToString + 'static,
        T: Clone + 'static,
    {
        let mut property = ChoiceProperty::new(SimpleTransformingValueProperty::new(
            SimpleValueProperty::new(description, binding),
            transformer,
        ));
        init(&mut property);
        self.register(property)
    }

    /// Choice property whose backing and exposed types coincide.
    pub fn simple_choice_property<T>(
        &self,
        description: Option<&str>,
        binding: FieldBinding<T>,
        init: impl FnOnce(&mut ChoiceProperty<T, T>),
    ) -> Rc<ChoiceProperty<T, T>>
    where
        T: Clone + PartialEq + ToString + 'static,
    {
        self.choice_property(description, binding, identity_transformer(), init)
    }

    /// Property persisted through a string backing value.
    pub fn persistent_property<T: Clone + 'static>(
        &self,
        description: Option<&str>,
        binding: FieldBinding<String>,
        transformer: Transformer<String, T>,
    ) -> Rc<SimplePersistentValueProperty<T>> {
        self.register(SimplePersistentValueProperty::new(
            SimpleValueProperty::new(description, binding),
            transformer,
        ))
    }

    pub fn persistent_string_property(
        &self,
        description: Option<&str>,
        binding: FieldBinding<String>,
    ) -> Rc<SimplePersistentValueProperty<String>> {
        self.persistent_property(description, binding, identity_transformer())
    }

    /// Persistent boolean property that can control other properties.
    pub fn persistent_boolean_property(
        &self,
        description: Option<&str>,
        binding: FieldBinding<String>,
        init: impl FnOnce(&mut SimplePersistentBooleanProperty),
    ) -> Rc<SimplePersistentBooleanProperty> {
        let mut property = SimplePersistentBooleanProperty::new(description, binding);
        init(&mut property);
        self.register(property)
    }

    /// Persistent choice property: string-backed, choice-restricted.
    pub fn persistent_choice_property<T: Clone + 'static>(
        &self,
        description: Option<&str>,
        binding: FieldBinding<String>,
        transformer: Transformer<String, T>,
        init: impl FnOnce(&mut PersistentChoiceProperty<T>),
    ) -> Rc<PersistentChoiceProperty<T>> {
        let mut property = PersistentChoiceProperty::new(
            SimpleValueProperty::new(description, binding),
            transformer,
        );
        init(&mut property);
        self.register(property)
    }
}

impl Default for SettingsGroup {
    fn default() -> Self {
        Self::new()
    }
}

/// A settings group with an immutable name, for rendering grouped settings
/// screens.
pub struct NamedSettingsGroup {
    name: String,
    group: SettingsGroup,
}

impl NamedSettingsGroup {
    pub fn new(name: impl Into<String>) -> Self {
        NamedSettingsGroup {
            name: name.into(),
            group: SettingsGroup::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Deref for NamedSettingsGroup {
    type Target = SettingsGroup;

    fn deref(&self) -> &SettingsGroup {
        &self.group
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::bind_field;
    use crate::settings::property::ValueProperty;

    struct State {
        theme: String,
        font_size: String,
    }

    fn state() -> Rc<RefCell<State>> {
        Rc::new(RefCell::new(State {
            theme: String::from("Adwaita"),
            font_size: String::from("11"),
        }))
    }

    #[test]
    fn builders_append_in_declaration_order() {
        let state = state();
        let group = SettingsGroup::new();

        group.string_property(None, bind_field!(state, theme));
        group.persistent_string_property(None, bind_field!(state, font_size));

        let names: Vec<String> = group
            .properties()
            .iter()
            .map(|property| property.name().to_owned())
            .collect();
        assert_eq!(names, vec!["theme", "font_size"]);
    }

    #[test]
    fn builder_returns_typed_handle_to_the_registered_property() {
        let state = state();
        let group = SettingsGroup::new();

        let typed = group.string_property(Some("GTK Theme"), bind_field!(state, theme));
        typed.set(String::from("Adwaita-dark"));

        let erased = &group.properties()[0];
        assert_eq!(erased.description(), "GTK Theme");
        assert_eq!(state.borrow().theme, "Adwaita-dark");
    }

    #[test]
    fn init_block_runs_before_registration() {
        let state = state();
        let group = SettingsGroup::new();

        let property = group.simple_choice_property(None, bind_field!(state, theme), |choice| {
            choice.set_choices(vec![String::from("Adwaita"), String::from("Adwaita-dark")]);
        });
        assert_eq!(property.choices().len(), 2);
        assert!(group.properties()[0].as_choice().is_some());
    }
}
