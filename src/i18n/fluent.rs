// SPDX-License-Identifier: MPL-2.0
//! Fluent bundle loading and message resolution.

use crate::app::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Loaded translation bundles plus the active locale.
pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

impl I18n {
    /// Loads every embedded `.ftl` resource and resolves the startup
    /// locale from the CLI flag, the config, or the OS.
    pub fn new(cli_lang: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale_str) = filename.strip_suffix(".ftl") else {
                continue;
            };
            let Ok(locale) = locale_str.parse::<LanguageIdentifier>() else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };

            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let resource =
                FluentResource::try_new(source).expect("embedded FTL resource must parse");
            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            bundle
                .add_resource(resource)
                .expect("embedded FTL resource must load");
            bundles.insert(locale.clone(), bundle);
            available_locales.push(locale);
        }

        available_locales.sort_by_key(std::string::ToString::to_string);

        let default_locale: LanguageIdentifier =
            "en-US".parse().expect("default locale is valid");
        let current_locale =
            resolve_locale(cli_lang, config, &available_locales).unwrap_or(default_locale);

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    /// Switches the active locale if it is available.
    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    /// Returns the active locale.
    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    /// Resolves a message key to its translation in the active locale.
    #[must_use]
    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Resolves a message key with interpolation arguments.
    #[must_use]
    pub fn tr_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            // Numeric strings become numbers so Fluent plural rules apply.
            if let Ok(number) = value.parse::<f64>() {
                fluent_args.set(*name, number);
            } else {
                fluent_args.set(*name, *value);
            }
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(bundle) = self.bundles.get(&self.current_locale) {
            if let Some(message) = bundle.get_message(key) {
                if let Some(pattern) = message.value() {
                    let mut errors = vec![];
                    let value = bundle.format_pattern(pattern, args, &mut errors);
                    if errors.is_empty() {
                        return value.to_string();
                    }
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

fn resolve_locale(
    cli_lang: Option<String>,
    config: &Config,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    // 1. CLI flag
    if let Some(lang_str) = cli_lang {
        if let Ok(lang) = lang_str.parse::<LanguageIdentifier>() {
            if available.contains(&lang) {
                return Some(lang);
            }
        }
    }

    // 2. Config file
    if let Some(lang_str) = &config.general.language {
        if let Ok(lang) = lang_str.parse::<LanguageIdentifier>() {
            if available.contains(&lang) {
                return Some(lang);
            }
        }
    }

    // 3. OS locale
    if let Some(os_locale_str) = sys_locale::get_locale() {
        if let Ok(os_lang) = os_locale_str.parse::<LanguageIdentifier>() {
            if available.contains(&os_lang) {
                return Some(os_lang);
            }
            // Try the primary language subtag alone (e.g. "fr" from "fr-CA").
            if let Ok(base) = os_lang.language.as_str().parse::<LanguageIdentifier>() {
                if available.contains(&base) {
                    return Some(base);
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_locales() {
        let i18n = I18n::default();
        assert!(!i18n.available_locales.is_empty());
        assert!(i18n
            .available_locales
            .iter()
            .any(|locale| locale.to_string() == "en-US"));
    }

    #[test]
    fn known_keys_resolve() {
        let i18n = I18n::default();
        let title = i18n.tr("window-title");
        assert!(!title.starts_with("MISSING:"), "{title}");
    }

    #[test]
    fn unknown_keys_are_marked_missing() {
        let i18n = I18n::default();
        assert_eq!(i18n.tr("no-such-key"), "MISSING: no-such-key");
    }

    #[test]
    fn cli_lang_wins_over_config() {
        let config = Config {
            general: crate::app::config::GeneralConfig {
                language: Some("en-US".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let i18n = I18n::new(Some("fr".to_string()), &config);
        if i18n.available_locales.iter().any(|l| l.to_string() == "fr") {
            assert_eq!(i18n.current_locale().to_string(), "fr");
        }
    }

    #[test]
    fn set_locale_ignores_unknown_locales() {
        let mut i18n = I18n::default();
        let before = i18n.current_locale().clone();
        i18n.set_locale("xx-XX".parse().expect("parse locale"));
        assert_eq!(i18n.current_locale(), &before);
    }

    #[test]
    fn plural_args_interpolate() {
        let mut i18n = I18n::default();
        i18n.set_locale("en-US".parse().expect("parse locale"));
        let message = i18n.tr_with_args("notification-collected", &[("count", "3")]);
        assert!(message.contains('3'), "{message}");
    }
}
