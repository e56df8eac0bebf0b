//! Declarative, observable application settings with string-based
//! persistence and enable/disable dependencies between properties.
//!
//! The crate has two layers:
//!
//! - [`settings`]: the generic framework. Properties bind to fields of an
//!   application-owned state struct, compose transformation, choice
//!   restriction, persistence, and controller behavior by wrapping, and are
//!   consumed through a type-erased surface with explicit capability
//!   queries.
//! - [`theming`]: concrete settings domains for desktop theme selection,
//!   currently GNOME.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use darkmode_settings::bind_field;
//! use darkmode_settings::settings::SettingsContainer;
//!
//! struct State {
//!     dark_gtk_theme: String,
//! }
//!
//! let state = Rc::new(RefCell::new(State {
//!     dark_gtk_theme: String::from("Adwaita-dark"),
//! }));
//! let container = SettingsContainer::new();
//! let binding_state = Rc::clone(&state);
//! container.unnamed_group(move |group| {
//!     group.persistent_string_property(Some("Dark GTK Theme"), bind_field!(binding_state, dark_gtk_theme));
//! });
//! container.validate().unwrap();
//!
//! let snapshot = container.persistent_snapshot();
//! assert_eq!(snapshot["dark_gtk_theme"], "Adwaita-dark");
//! ```

pub mod error;
pub mod settings;
pub mod theming;

pub use error::SettingsError;
pub use settings::{
    AnyProperty, ChoiceView, FieldBinding, PersistentProperty, ProviderRegistry,
    SettingsContainer, SettingsContainerProvider, SettingsGroup, Transformer, ValueProperty,
};
