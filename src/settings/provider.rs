//! Container providers and the process-wide provider registry.
//!
//! A provider knows whether its settings domain applies to the current
//! environment and how to build the container for it. The registry is the
//! explicit composition point: the embedding application registers every
//! provider it ships, then resolves once to obtain the container of the
//! first applicable provider. Nothing here is a global; the application
//! owns the registry instance.

use once_cell::unsync::OnceCell;

use crate::error::SettingsError;
use crate::settings::container::SettingsContainer;

/// Source of one settings domain's container.
pub trait SettingsContainerProvider {
    /// Whether this provider applies to the current environment. Disabled
    /// providers are skipped during registry resolution.
    fn enabled(&self) -> bool;

    /// Builds or returns the provider's container. Construction failures
    /// are declaration errors and surface to the caller.
    fn create(&self) -> Result<SettingsContainer, SettingsError>;
}

/// Provider that builds its container at most once and hands out clones of
/// the same instance afterwards. A failed construction is retried on the
/// next call.
pub struct SingletonSettingsContainerProvider {
    enabled: bool,
    factory: Box<dyn Fn() -> Result<SettingsContainer, SettingsError>>,
    container: OnceCell<SettingsContainer>,
}

impl SingletonSettingsContainerProvider {
    pub fn new(
        enabled: bool,
        factory: impl Fn() -> Result<SettingsContainer, SettingsError> + 'static,
    ) -> Self {
        SingletonSettingsContainerProvider {
            enabled,
            factory: Box::new(factory),
            container: OnceCell::new(),
        }
    }
}

impl SettingsContainerProvider for SingletonSettingsContainerProvider {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn create(&self) -> Result<SettingsContainer, SettingsError> {
        self.container
            .get_or_try_init(|| (self.factory)())
            .map(SettingsContainer::clone)
    }
}

/// Ordered collection of providers with first-enabled-wins resolution.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn SettingsContainerProvider>>,
    active: OnceCell<Option<SettingsContainer>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        ProviderRegistry {
            providers: Vec::new(),
            active: OnceCell::new(),
        }
    }

    /// Appends a provider. Registration order is resolution priority.
    /// Fails once the registry has resolved; the provider set is fixed for
    /// the registry's lifetime after that point.
    pub fn register(
        &mut self,
        provider: impl SettingsContainerProvider + 'static,
    ) -> Result<(), SettingsError> {
        if self.active.get().is_some() {
            return Err(SettingsError::RegistryFrozen);
        }
        self.providers.push(Box::new(provider));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The container of the first enabled provider, or `None` when no
    /// provider applies. The outcome is computed once and cached; later
    /// calls return the same container.
    pub fn resolve(&self) -> Result<Option<SettingsContainer>, SettingsError> {
        self.active
            .get_or_try_init(|| {
                for provider in &self.providers {
                    if provider.enabled() {
                        let container = provider.create()?;
                        log::info!(
                            "settings provider resolved: {} properties",
                            container.all_properties().len()
                        );
                        return Ok(Some(container));
                    }
                }
                log::info!("no enabled settings provider found");
                Ok(None)
            })
            .map(Option::clone)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
