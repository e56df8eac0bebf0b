//! GNOME settings container: GTK theme selection for light, dark, and high
//! contrast mode, plus a flag that switches to name-based theme guessing.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bind_field;
use crate::error::SettingsError;
use crate::settings::{
    transformer_of, SettingsContainer, SingletonSettingsContainerProvider, Transformer,
};
use crate::theming::GtkTheme;

pub const DEFAULT_LIGHT_THEME: &str = "Adwaita";
pub const DEFAULT_DARK_THEME: &str = "Adwaita-dark";
pub const DEFAULT_HIGH_CONTRAST_THEME: &str = "HighContrast";

/// Persisted GNOME theme configuration. Fields hold the serialized backing
/// strings the properties read and write; the typed view lives on the
/// properties themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GnomeThemeState {
    pub light_gtk_theme: String,
    pub dark_gtk_theme: String,
    pub high_contrast_gtk_theme: String,
    pub guess_light_and_dark_themes: String,
}

impl Default for GnomeThemeState {
    fn default() -> Self {
        GnomeThemeState {
            light_gtk_theme: String::from(DEFAULT_LIGHT_THEME),
            dark_gtk_theme: String::from(DEFAULT_DARK_THEME),
            high_contrast_gtk_theme: String::from(DEFAULT_HIGH_CONTRAST_THEME),
            guess_light_and_dark_themes: String::from("true"),
        }
    }
}

fn gtk_theme_transformer(fallback: &str) -> Transformer<String, GtkTheme> {
    transformer_of(
        |theme: &GtkTheme| Some(theme.name().to_owned()),
        |raw: &String| GtkTheme::new(raw.clone()),
    )
    .write_fallback(fallback.to_owned())
}

/// Every selectable theme name: the stock defaults plus whatever is
/// installed, sorted and deduplicated.
fn theme_choices(installed_themes: &[GtkTheme]) -> Vec<String> {
    let mut choices: Vec<String> = installed_themes
        .iter()
        .map(|theme| theme.name().to_owned())
        .chain([
            String::from(DEFAULT_LIGHT_THEME),
            String::from(DEFAULT_DARK_THEME),
            String::from(DEFAULT_HIGH_CONTRAST_THEME),
        ])
        .collect();
    choices.sort();
    choices.dedup();
    choices
}

/// The GNOME settings domain: its state store and the container declared
/// over it.
pub struct GnomeSettings {
    state: Rc<RefCell<GnomeThemeState>>,
    container: SettingsContainer,
}

impl GnomeSettings {
    /// Declares the GNOME container. While guessing is enabled the three
    /// theme pickers are inactive; disabling the flag reactivates them.
    pub fn new(installed_themes: &[GtkTheme]) -> Result<Self, SettingsError> {
        let state = Rc::new(RefCell::new(GnomeThemeState::default()));
        let container = SettingsContainer::new();
        let choices = theme_choices(installed_themes);

        let light_ref = container.with_name("light_gtk_theme");
        let dark_ref = container.with_name("dark_gtk_theme");
        let high_contrast_ref = container.with_name("high_contrast_gtk_theme");

        let group_state = Rc::clone(&state);
        container.group("Gnome Theme", move |group| {
            group.persistent_boolean_property(
                Some("Guess light/dark theme based on name"),
                bind_field!(group_state, guess_light_and_dark_themes),
                |guess| {
                    guess.invert();
                    guess.control(light_ref);
                    guess.control(dark_ref);
                    guess.control(high_contrast_ref);
                },
            );
            group.persistent_choice_property(
                Some("Light GTK Theme"),
                bind_field!(group_state, light_gtk_theme),
                gtk_theme_transformer(DEFAULT_LIGHT_THEME),
                |picker| picker.set_choices(choices.clone()),
            );
            group.persistent_choice_property(
                Some("Dark GTK Theme"),
                bind_field!(group_state, dark_gtk_theme),
                gtk_theme_transformer(DEFAULT_DARK_THEME),
                |picker| picker.set_choices(choices.clone()),
            );
            group.persistent_choice_property(
                Some("High Contrast GTK Theme"),
                bind_field!(group_state, high_contrast_gtk_theme),
                gtk_theme_transformer(DEFAULT_HIGH_CONTRAST_THEME),
                |picker| picker.set_choices(choices.clone()),
            );
        });

        container.validate()?;
        Ok(GnomeSettings { state, container })
    }

    pub fn container(&self) -> &SettingsContainer {
        &self.container
    }

    pub fn into_container(self) -> SettingsContainer {
        self.container
    }

    pub fn state(&self) -> GnomeThemeState {
        self.state.borrow().clone()
    }
}

/// Singleton provider for the GNOME settings domain. `enabled` is decided by
/// the embedder (normally: running under a GNOME session).
pub fn gnome_settings_provider(
    enabled: bool,
    installed_themes: Vec<GtkTheme>,
) -> SingletonSettingsContainerProvider {
    SingletonSettingsContainerProvider::new(enabled, move || {
        GnomeSettings::new(&installed_themes).map(GnomeSettings::into_container)
    })
}
