//! Declarative settings framework.
//!
//! The framework separates three concerns that settings code usually tangles
//! together:
//!
//! - **Storage**: values live in application-owned state structs, reached
//!   through [`FieldBinding`] accessor pairs ([`bind_field!`](crate::bind_field)).
//! - **Declaration**: [`SettingsContainer`] and [`SettingsGroup`] build an
//!   ordered tree of typed properties, with transformation
//!   ([`Transformer`]), choice restriction, persistence, and enable/disable
//!   dependencies composed by wrapping.
//! - **Consumption**: UIs and storage layers see only the erased
//!   [`AnyProperty`] surface and discover extra capabilities through the
//!   `as_persistent` / `as_choice` / `as_controller` queries.
//!
//! Everything is single-threaded; handles are `Rc`-based and values sit in
//! `RefCell`/`Cell` slots. Embedders that need cross-thread access keep the
//! container on one thread and communicate through their own channels.

pub mod binding;
pub mod choice;
pub mod container;
pub mod controller;
pub mod group;
pub mod observable;
pub mod property;
pub mod provider;
pub mod transformer;

pub use binding::FieldBinding;
pub use choice::{ChoiceProperty, PersistentChoiceProperty};
pub use container::SettingsContainer;
pub use controller::{
    AnyController, LazyPropertyRef, PropertyController, SimpleBooleanProperty,
    SimplePersistentBooleanProperty,
};
pub use group::{NamedSettingsGroup, SettingsGroup};
pub use observable::{ListenerId, ListenerResult, ObservableValue, Observers};
pub use property::{
    AnyProperty, ChoiceView, PersistentProperty, PropertyListener, SimplePersistentValueProperty,
    SimpleTransformingValueProperty, SimpleValueProperty, ValueProperty,
};
pub use provider::{
    ProviderRegistry, SettingsContainerProvider, SingletonSettingsContainerProvider,
};
pub use transformer::{identity_transformer, read_or, transformer_of, Transformer};
