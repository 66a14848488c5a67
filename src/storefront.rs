//! Storefront
//!
//! Reference data bundled for the ordering flow: catalog, option rules and
//! translations, loaded once and shared read-only.

use std::path::Path;

use thiserror::Error;

use crate::{
    i18n::{Translations, TranslationsError},
    menu::{CatalogError, Category, ItemId, MenuCatalog},
    options::{OptionProfile, OptionRules},
    session::{CustomizationSession, SessionError},
};

/// Errors raised while loading storefront reference data.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Menu catalog failed to load
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Translations failed to load
    #[error(transparent)]
    Translations(#[from] TranslationsError),
}

/// Catalog, option rules and translations.
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: MenuCatalog,
    rules: OptionRules,
    translations: Translations,
}

impl Storefront {
    /// Bundle a catalog with its translations. Option rules are derived from the catalog.
    pub fn new(catalog: MenuCatalog, translations: Translations) -> Self {
        let rules = OptionRules::for_catalog(&catalog);

        Self {
            catalog,
            rules,
            translations,
        }
    }

    /// The catalog and translations shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is malformed.
    pub fn embedded() -> Result<Self, StorefrontError> {
        Ok(Self::new(MenuCatalog::embedded()?, Translations::embedded()?))
    }

    /// Load from optional override files, falling back to the embedded data
    /// for whichever is not given.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be read or parsed.
    pub fn load(
        menu: Option<&Path>,
        translations: Option<&Path>,
        language: &str,
    ) -> Result<Self, StorefrontError> {
        let catalog = match menu {
            Some(path) => MenuCatalog::from_path(path)?,
            None => MenuCatalog::embedded()?,
        };

        let translations = match translations {
            Some(path) => Translations::from_path(path)?,
            None => Translations::embedded()?,
        };

        Ok(Self::new(catalog, translations.with_language(language)))
    }

    /// Menu catalog.
    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    /// Option rules.
    pub fn rules(&self) -> &OptionRules {
        &self.rules
    }

    /// Translations.
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Browsable menu grouped by category.
    pub fn menu(&self) -> Vec<Category> {
        self.catalog.categories(&self.translations)
    }

    /// Options offered by an item.
    pub fn profile(&self, item: ItemId) -> OptionProfile {
        self.rules.resolve(item)
    }

    /// Start customizing an item.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ItemUnavailable`] if the item is not in the catalog.
    pub fn open_item(&self, item: ItemId) -> Result<CustomizationSession<'_>, SessionError> {
        CustomizationSession::open(&self.catalog, &self.rules, &self.translations, item)
    }
}
