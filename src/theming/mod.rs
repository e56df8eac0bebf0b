//! Desktop theme types and concrete settings containers built on the
//! framework in [`crate::settings`].

pub mod gnome;

pub use gnome::{
    gnome_settings_provider, GnomeSettings, GnomeThemeState, DEFAULT_DARK_THEME,
    DEFAULT_HIGH_CONTRAST_THEME, DEFAULT_LIGHT_THEME,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of an installed GTK theme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GtkTheme(String);

impl GtkTheme {
    pub fn new(name: impl Into<String>) -> Self {
        GtkTheme(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GtkTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GtkTheme {
    fn from(name: &str) -> Self {
        GtkTheme::new(name)
    }
}
