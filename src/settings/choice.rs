//! Choice-restricted properties.
//!
//! A choice property is a transforming property additionally constrained to
//! a finite, ordered set of permissible backing values, with a rendering
//! function supplying display labels. The restriction is advisory for
//! direct writes (the framework does not forbid storing an out-of-range
//! backing value) but is enforced on the persistence restore path, where an
//! unknown persisted value degrades to the configured write fallback.

use std::rc::Rc;

use crate::error::SettingsError;
use crate::settings::observable::ListenerId;
use crate::settings::property::{
    AnyProperty, ChoiceView, PersistentProperty, PropertyListener, SimpleTransformingValueProperty,
    SimpleValueProperty, ValueProperty,
};
use crate::settings::transformer::Transformer;

/// Transforming property restricted to an enumerated set of backing values.
pub struct ChoiceProperty<R, T> {
    delegate: SimpleTransformingValueProperty<R, T>,
    choices: Vec<R>,
    renderer: Rc<dyn Fn(&R) -> String>,
}

impl<R, T> ChoiceProperty<R, T>
where
    R: Clone + ToString + 'static,
    T: Clone + 'static,
{
    /// Wraps a transforming property. The choice list starts empty and the
    /// renderer defaults to `ToString`; both are normally filled in by the
    /// declaration's init block.
    pub fn new(delegate: SimpleTransformingValueProperty<R, T>) -> Self {
        ChoiceProperty {
            delegate,
            choices: Vec::new(),
            renderer: Rc::new(|choice: &R| choice.to_string()),
        }
    }
}

impl<R, T> ChoiceProperty<R, T>
where
    R: Clone + PartialEq + 'static,
    T: Clone + 'static,
{
    pub fn choices(&self) -> &[R] {
        &self.choices
    }

    pub fn set_choices(&mut self, choices: Vec<R>) {
        self.choices = choices;
    }

    pub fn set_renderer(&mut self, renderer: impl Fn(&R) -> String + 'static) {
        self.renderer = Rc::new(renderer);
    }

    pub fn render(&self, choice: &R) -> String {
        (self.renderer)(choice)
    }

    pub fn backing_value(&self) -> R {
        self.delegate.backing_value()
    }

    pub fn set_backing_value(&self, backing: R) {
        self.delegate.set_backing_value(backing);
    }

    pub fn write_fallback_value(&self) -> Option<&R> {
        self.delegate.write_fallback_value()
    }

    fn contains(&self, backing: &R) -> bool {
        self.choices.iter().any(|choice| choice == backing)
    }
}

impl<R, T> AnyProperty for ChoiceProperty<R, T>
where
    R: Clone + PartialEq + 'static,
    T: Clone + 'static,
{
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

    fn as_choice(&self) -> Option<&dyn ChoiceView> {
        Some(self)
    }
}

impl<R, T> ValueProperty<T> for ChoiceProperty<R, T>
where
    R: Clone + PartialEq + 'static,
    T: Clone + 'static,
{
    fn get(&self) -> T {
        self.delegate.get()
    }

    fn set(&self, value: T) {
        self.delegate.set(value);
    }
}

impl<R, T> ChoiceView for ChoiceProperty<R, T>
where
    R: Clone + PartialEq + 'static,
    T: Clone + 'static,
{
    fn rendered_choices(&self) -> Vec<String> {
        self.choices.iter().map(|choice| (self.renderer)(choice)).collect()
    }

    fn rendered_value(&self) -> String {
        (self.renderer)(&self.backing_value())
    }

    fn len(&self) -> usize {
        self.choices.len()
    }

    fn select(&self, index: usize) -> Result<(), SettingsError> {
        let choice = self
            .choices
            .get(index)
            .cloned()
            .ok_or(SettingsError::ChoiceIndexOutOfRange {
                index,
                len: self.choices.len(),
            })?;
        self.set_backing_value(choice);
        Ok(())
    }
}

/// Choice property whose backing values are the persisted string forms.
pub struct PersistentChoiceProperty<T> {
    delegate: ChoiceProperty<String, T>,
}

impl<T: Clone + 'static> PersistentChoiceProperty<T> {
    pub fn new(delegate: SimpleValueProperty<String>, transformer: Transformer<String, T>) -> Self {
        PersistentChoiceProperty {
            delegate: ChoiceProperty::new(SimpleTransformingValueProperty::new(delegate, transformer)),
        }
    }

    pub fn choices(&self) -> &[String] {
        self.delegate.choices()
    }

    pub fn set_choices(&mut self, choices: Vec<String>) {
        self.delegate.set_choices(choices);
    }

    pub fn set_renderer(&mut self, renderer: impl Fn(&String) -> String + 'static) {
        self.delegate.set_renderer(renderer);
    }

    pub fn backing_value(&self) -> String {
        self.delegate.backing_value()
    }

    pub fn set_backing_value(&self, backing: String) {
        self.delegate.set_backing_value(backing);
    }
}

impl<T: Clone + 'static> AnyProperty for PersistentChoiceProperty<T> {
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

    fn as_choice(&self) -> Option<&dyn ChoiceView> {
        Some(&self.delegate)
    }
}

impl<T: Clone + 'static> ValueProperty<T> for PersistentChoiceProperty<T> {
    fn get(&self) -> T {
        self.delegate.get()
    }

    fn set(&self, value: T) {
        self.delegate.set(value);
    }
}

impl<T: Clone + 'static> PersistentProperty for PersistentChoiceProperty<T> {
    fn backing_string(&self) -> String {
        self.delegate.backing_value()
    }

    /// A restored string present in the choice list is stored verbatim; one
    /// absent from the list degrades to the transformer's write fallback.
    /// Without a fallback the backing value is left unchanged.
    fn restore_backing_string(&self, raw: &str) {
        if self.delegate.choices().iter().any(|choice| choice == raw) {
            self.delegate.set_backing_value(raw.to_owned());
            return;
        }
        match self.delegate.write_fallback_value().cloned() {
            Some(fallback) => {
                log::warn!(
                    "persisted value '{}' for property '{}' is not among the configured choices; \
                     falling back to '{}'",
                    raw,
                    self.name(),
                    fallback
                );
                self.delegate.set_backing_value(fallback);
            }
            None => log::warn!(
                "persisted value '{}' for property '{}' is not among the configured choices and \
                 no fallback is configured; backing value left unchanged",
                raw,
                self.name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::bind_field;
    use crate::settings::transformer::transformer_of;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Theme(String);

    struct State {
        theme: String,
    }

    fn theme_transformer() -> Transformer<String, Theme> {
        transformer_of(
            |theme: &Theme| Some(theme.0.clone()),
            |raw: &String| Theme(raw.clone()),
        )
    }

    fn gtk_choices() -> Vec<String> {
        vec![
            String::from("Adwaita"),
            String::from("Adwaita-dark"),
            String::from("HighContrast"),
        ]
    }

    fn property(state: &Rc<RefCell<State>>, fallback: Option<&str>) -> PersistentChoiceProperty<Theme> {
        let mut transformer = theme_transformer();
        if let Some(fallback) = fallback {
            transformer = transformer.write_fallback(fallback.to_owned());
        }
        let mut property = PersistentChoiceProperty::new(
            SimpleValueProperty::new(Some("Dark GTK Theme"), bind_field!(state, theme)),
            transformer,
        );
        property.set_choices(gtk_choices());
        property
    }

    fn state() -> Rc<RefCell<State>> {
        Rc::new(RefCell::new(State {
            theme: String::from("Adwaita"),
        }))
    }

    #[test]
    fn backing_value_within_choices_is_exposed_through_transform() {
        let state = state();
        let property = property(&state, None);

        property.set_backing_value(String::from("Adwaita-dark"));
        assert_eq!(property.get(), Theme(String::from("Adwaita-dark")));
    }

    #[test]
    fn restore_of_unknown_value_degrades_to_fallback() {
        let state = state();
        let property = property(&state, Some("Adwaita-dark"));

        property
            .as_persistent()
            .unwrap()
            .restore_backing_string("Unknown-Theme");
        assert_eq!(property.backing_value(), "Adwaita-dark");
        assert_eq!(state.borrow().theme, "Adwaita-dark");
    }

    #[test]
    fn restore_of_unknown_value_without_fallback_keeps_backing() {
        let state = state();
        let property = property(&state, None);

        property
            .as_persistent()
            .unwrap()
            .restore_backing_string("Unknown-Theme");
        assert_eq!(property.backing_value(), "Adwaita");
    }

    #[test]
    fn restore_of_known_value_is_verbatim() {
        let state = state();
        let property = property(&state, Some("Adwaita"));

        property
            .as_persistent()
            .unwrap()
            .restore_backing_string("HighContrast");
        assert_eq!(property.backing_value(), "HighContrast");
    }

    #[test]
    fn choice_view_renders_and_selects() {
        let state = state();
        let mut property = property(&state, None);
        property.set_renderer(|name: &String| name.to_uppercase());

        let view = property.as_choice().unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(
            view.rendered_choices(),
            vec!["ADWAITA", "ADWAITA-DARK", "HIGHCONTRAST"]
        );

        view.select(1).unwrap();
        assert_eq!(property.backing_value(), "Adwaita-dark");
        assert_eq!(view.rendered_value(), "ADWAITA-DARK");

        let err = view.select(9).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::ChoiceIndexOutOfRange { index: 9, len: 3 }
        ));
    }
}
