// SPDX-License-Identifier: MPL-2.0
//! Theme mode selection, including system theme detection.

use serde::{Deserialize, Serialize};

/// User-selectable theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// All modes offered in the settings form, in display order.
    pub const ALL: &'static [ThemeMode] = &[ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    /// Resolves the mode to a concrete dark/light answer, asking the
    /// platform when set to `System`.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => !matches!(dark_light::detect(), Ok(dark_light::Mode::Light)),
        }
    }

    /// The iced theme for this mode.
    #[must_use]
    pub fn theme(&self) -> iced::Theme {
        if self.is_dark() {
            iced::Theme::Dark
        } else {
            iced::Theme::Light
        }
    }

    /// The i18n key for the mode's label in the settings form.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ThemeMode::Light => "theme-mode-light",
            ThemeMode::Dark => "theme-mode-dark",
            ThemeMode::System => "theme-mode-system",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_modes_resolve_without_asking_the_platform() {
        assert!(!ThemeMode::Light.is_dark());
        assert!(ThemeMode::Dark.is_dark());
    }

    #[test]
    fn default_mode_is_system() {
        assert_eq!(ThemeMode::default(), ThemeMode::System);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ThemeMode::Dark).expect("serialize"),
            "\"dark\""
        );
    }
}
