//! Catalog Config

use std::path::PathBuf;

use clap::Args;

use crate::{
    i18n::DEFAULT_LANGUAGE,
    storefront::{Storefront, StorefrontError},
};

/// Menu and translation sources.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Menu catalog YAML; the built-in menu is used when unset
    #[arg(long, env = "STOREFRONT_MENU")]
    pub menu: Option<PathBuf>,

    /// Translations YAML; the built-in table is used when unset
    #[arg(long, env = "STOREFRONT_TRANSLATIONS")]
    pub translations: Option<PathBuf>,

    /// Display language
    #[arg(long, env = "STOREFRONT_LANG", default_value = DEFAULT_LANGUAGE)]
    pub lang: String,
}

impl CatalogConfig {
    /// Load the storefront reference data.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read or parsed.
    pub fn load(&self) -> Result<Storefront, StorefrontError> {
        Storefront::load(
            self.menu.as_deref(),
            self.translations.as_deref(),
            &self.lang,
        )
    }
}
