//! Translations
//!
//! Display strings keyed by translation key and language. A missing key or
//! language never fails: callers fall back to the raw key.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "gr";

const EMBEDDED_TRANSLATIONS: &str = include_str!("../fixtures/translations.yml");

/// Errors raised while loading a translations table.
#[derive(Debug, Error)]
pub enum TranslationsError {
    /// IO error reading a translations file
    #[error("Failed to read translations file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse translations YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Translation table for one active language.
#[derive(Debug, Clone)]
pub struct Translations {
    entries: FxHashMap<String, FxHashMap<String, String>>,
    language: String,
}

impl Translations {
    /// A table with no entries; every lookup falls back to the key.
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Parse a `key -> language -> text` YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TranslationsError> {
        Ok(Self {
            entries: serde_norway::from_str(yaml)?,
            language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    /// Load a translations table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TranslationsError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// The table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded table is malformed.
    pub fn embedded() -> Result<Self, TranslationsError> {
        Self::from_yaml_str(EMBEDDED_TRANSLATIONS)
    }

    /// Switch the active language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The active language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look up a key (then its upper-case form) in the active language.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }

        self.entry(key).or_else(|| self.entry(&key.to_uppercase()))
    }

    /// Translate a key, falling back to the key itself.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    /// Label for a category key; untranslated keys are title-cased
    /// (`SOFT_DRINKS` becomes `Soft Drinks`).
    pub fn category_label(&self, key: &str) -> String {
        self.lookup(key)
            .map_or_else(|| prettify_key(key), ToString::to_string)
    }

    /// Resolve a description for an item.
    ///
    /// Tries the explicit description key, then `<name>_DESC`-style keys
    /// derived from the item name, and finally the raw description.
    pub fn describe<'a>(&'a self, name: &str, description: Option<&'a str>) -> Option<&'a str> {
        let upper = name.to_uppercase();
        let candidates = [
            format!("{name}_DESC"),
            format!("{upper}_DESC"),
            format!("{name}Desc"),
            format!("{name}desc"),
        ];

        description
            .and_then(|key| self.lookup(key))
            .or_else(|| candidates.iter().find_map(|key| self.lookup(key)))
            .or(description)
    }

    fn entry(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|languages| languages.get(&self.language))
            .map(String::as_str)
    }
}

fn prettify_key(key: &str) -> String {
    key.to_lowercase()
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();

            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const YAML: &str = "
ESPRESSO:
  gr: Εσπρέσο
  en: Espresso
ESPRESSO_DESC:
  en: A short strong coffee
COFFEES:
  gr: Καφέδες
";

    #[test]
    fn translate_uses_active_language() -> TestResult {
        let translations = Translations::from_yaml_str(YAML)?;

        assert_eq!(translations.translate("ESPRESSO"), "Εσπρέσο");
        assert_eq!(
            translations.with_language("en").translate("ESPRESSO"),
            "Espresso"
        );

        Ok(())
    }

    #[test]
    fn missing_key_falls_back_to_key() -> TestResult {
        let translations = Translations::from_yaml_str(YAML)?;

        assert_eq!(translations.translate("LATTE"), "LATTE");

        Ok(())
    }

    #[test]
    fn missing_language_falls_back_to_key() -> TestResult {
        let translations = Translations::from_yaml_str(YAML)?.with_language("de");

        assert_eq!(translations.translate("ESPRESSO"), "ESPRESSO");

        Ok(())
    }

    #[test]
    fn lookup_retries_upper_case() -> TestResult {
        let translations = Translations::from_yaml_str(YAML)?;

        assert_eq!(translations.lookup("espresso"), Some("Εσπρέσο"));

        Ok(())
    }

    #[test]
    fn category_label_prettifies_unknown_keys() -> TestResult {
        let translations = Translations::from_yaml_str(YAML)?;

        assert_eq!(translations.category_label("COFFEES"), "Καφέδες");
        assert_eq!(translations.category_label("SOFT_DRINKS"), "Soft Drinks");

        Ok(())
    }

    #[test]
    fn describe_tries_name_derived_keys() -> TestResult {
        let translations = Translations::from_yaml_str(YAML)?.with_language("en");

        assert_eq!(
            translations.describe("ESPRESSO", None),
            Some("A short strong coffee")
        );
        assert_eq!(
            translations.describe("LATTE", Some("Milky")),
            Some("Milky")
        );
        assert_eq!(translations.describe("LATTE", None), None);

        Ok(())
    }

    #[test]
    fn embedded_table_parses() -> TestResult {
        let translations = Translations::embedded()?;

        assert_eq!(translations.language(), DEFAULT_LANGUAGE);

        Ok(())
    }
}
