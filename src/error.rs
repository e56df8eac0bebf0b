use thiserror::Error;

/// Errors produced by the settings framework.
///
/// Transformation failures are deliberately absent from this enum: a failed
/// write-transform is recovered locally through the transformer's fallback
/// value (or by leaving the backing value unchanged) and never surfaces as an
/// error. The variants below all describe declaration or lifecycle mistakes
/// made by the embedding code.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A lazy property reference named a property that is not registered in
    /// the container. This is a declaration error (typo'd name, or a
    /// controller wired before the target property was added) and should be
    /// caught by [`SettingsContainer::validate`](crate::settings::SettingsContainer::validate)
    /// during container construction.
    #[error("no property named '{name}' is registered in the container")]
    UnknownProperty { name: String },

    /// The container backing a lazy property reference was dropped before the
    /// reference was first resolved.
    #[error("settings container was dropped before property '{name}' could be resolved")]
    ContainerDropped { name: String },

    /// Two properties in the same container share a name. Lookup by name
    /// assumes uniqueness, so this is rejected during validation.
    #[error("duplicate property name '{name}' in container")]
    DuplicateProperty { name: String },

    /// A choice selection referred to an index outside the configured choice
    /// list.
    #[error("choice index {index} is out of range for {len} choices")]
    ChoiceIndexOutOfRange { index: usize, len: usize },

    /// A provider was registered after the registry already resolved its
    /// active container. The late provider could never take effect, so the
    /// call is rejected instead of being silently ignored.
    #[error("provider registry is frozen; the active container was already resolved")]
    RegistryFrozen,
}
