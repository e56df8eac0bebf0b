//! Field bindings: the storage seam between a property and the state it
//! mutates.
//!
//! A property owns no value of its own; it reads and writes through an
//! explicit accessor pair supplied at construction time, typically produced
//! by [`bind_field!`](crate::bind_field) over a shared state struct. The
//! binding's name (the field identifier) is what property names and
//! description fallbacks derive from.

/// Named getter/setter pair over one slot of externally owned state.
pub struct FieldBinding<T> {
    name: String,
    getter: Box<dyn Fn() -> T>,
    setter: Box<dyn Fn(T)>,
}

impl<T> FieldBinding<T> {
    pub fn new(
        name: impl Into<String>,
        getter: impl Fn() -> T + 'static,
        setter: impl Fn(T) + 'static,
    ) -> Self {
        FieldBinding {
            name: name.into(),
            getter: Box::new(getter),
            setter: Box::new(setter),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> T {
        (self.getter)()
    }

    pub fn set(&self, value: T) {
        (self.setter)(value)
    }
}

/// Binds a field of an `Rc<RefCell<State>>` store, naming the binding after
/// the field identifier.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use darkmode_settings::bind_field;
///
/// struct State {
///     theme: String,
/// }
///
/// let state = Rc::new(RefCell::new(State { theme: String::from("Adwaita") }));
/// let binding = bind_field!(state, theme);
/// assert_eq!(binding.name(), "theme");
/// binding.set(String::from("Adwaita-dark"));
/// assert_eq!(state.borrow().theme, "Adwaita-dark");
/// ```
#[macro_export]
macro_rules! bind_field {
    ($store:expr, $field:ident) => {{
        let getter_store = ::std::rc::Rc::clone(&$store);
        let setter_store = ::std::rc::Rc::clone(&$store);
        $crate::settings::FieldBinding::new(
            stringify!($field),
            move || getter_store.borrow().$field.clone(),
            move |value| setter_store.borrow_mut().$field = value,
        )
    }};
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    struct State {
        dark_gtk_theme: String,
        guess: bool,
    }

    fn state() -> Rc<RefCell<State>> {
        Rc::new(RefCell::new(State {
            dark_gtk_theme: String::from("Adwaita-dark"),
            guess: true,
        }))
    }

    #[test]
    fn binding_reads_and_writes_the_store() {
        let state = state();
        let binding = bind_field!(state, dark_gtk_theme);

        assert_eq!(binding.get(), "Adwaita-dark");
        binding.set(String::from("HighContrast"));
        assert_eq!(state.borrow().dark_gtk_theme, "HighContrast");
    }

    #[test]
    fn binding_name_is_the_field_identifier() {
        let state = state();
        let theme = bind_field!(state, dark_gtk_theme);
        let guess = bind_field!(state, guess);

        assert_eq!(theme.name(), "dark_gtk_theme");
        assert_eq!(guess.name(), "guess");
    }
}
