//! Menu Catalog
//!
//! Static reference data for the storefront: orderable items and the two
//! extras catalogs. Loaded once at startup and never mutated afterwards.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{i18n::Translations, options::ExtrasCatalog};

pub mod search;

/// Stable identifier of a menu item.
pub type ItemId = u32;

const EMBEDDED_MENU: &str = include_str!("../../fixtures/menu.yml");

/// Errors raised while loading the menu catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two items share the same id
    #[error("Duplicate menu item id: {0}")]
    DuplicateId(ItemId),

    /// An item or ingredient carries a negative price
    #[error("Negative price for {0}")]
    NegativePrice(String),

    /// An ingredient name appears twice within one extras catalog
    #[error("Duplicate ingredient {name} in {catalog} extras")]
    DuplicateIngredient {
        /// Catalog that holds the duplicate
        catalog: ExtrasCatalog,

        /// Offending ingredient name
        name: String,
    },
}

/// An orderable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Item id
    pub id: ItemId,

    /// Translation key or literal display name
    pub name: String,

    /// Category key, e.g. `COFFEES`
    pub category: String,

    /// Base price
    pub price: Decimal,

    /// Optional description (translation key or literal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A priced add-on ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name
    pub name: String,

    /// Price added on top of the item price
    pub price: Decimal,
}

impl Ingredient {
    /// Create a new ingredient.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Raw catalog as it appears in YAML.
#[derive(Debug, Deserialize)]
struct MenuFixture {
    items: Vec<MenuItem>,

    #[serde(default)]
    savory_extras: Vec<Ingredient>,

    #[serde(default)]
    sweet_extras: Vec<Ingredient>,
}

/// A category of the browsable menu, with display-ready entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Category key as it appears on items
    pub key: String,

    /// Translated (or prettified) category label
    pub label: String,

    /// Items in catalog order
    pub items: Vec<MenuEntry>,
}

/// A menu item with its display strings resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    /// Item id
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Display description, when one is known
    pub description: Option<String>,

    /// Base price
    pub price: Decimal,
}

/// The menu catalog.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    index: FxHashMap<ItemId, usize>,
    savory_extras: Vec<Ingredient>,
    sweet_extras: Vec<Ingredient>,
}

impl MenuCatalog {
    /// Build a catalog from items and extras.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateId`]: two items share an id.
    /// - [`CatalogError::NegativePrice`]: an item or ingredient has a price below zero.
    /// - [`CatalogError::DuplicateIngredient`]: a name repeats within one extras catalog.
    pub fn new(
        items: Vec<MenuItem>,
        savory_extras: Vec<Ingredient>,
        sweet_extras: Vec<Ingredient>,
    ) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();

        for (position, item) in items.iter().enumerate() {
            if item.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(item.name.clone()));
            }

            if index.insert(item.id, position).is_some() {
                return Err(CatalogError::DuplicateId(item.id));
            }
        }

        check_extras(ExtrasCatalog::Savory, &savory_extras)?;
        check_extras(ExtrasCatalog::Sweet, &sweet_extras)?;

        Ok(Self {
            items,
            index,
            savory_extras,
            sweet_extras,
        })
    }

    /// Parse a catalog from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the catalog is inconsistent.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: MenuFixture = serde_norway::from_str(yaml)?;

        Self::new(fixture.items, fixture.savory_extras, fixture.sweet_extras)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is inconsistent.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml_str(EMBEDDED_MENU)
    }

    /// All items in catalog order.
    pub fn list_all(&self) -> &[MenuItem] {
        &self.items
    }

    /// Look up an item by id. `None` means the item is unavailable.
    pub fn find_by_id(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.get(*self.index.get(&id)?)
    }

    /// Ingredients of one extras catalog, in catalog order.
    pub fn extras(&self, catalog: ExtrasCatalog) -> &[Ingredient] {
        match catalog {
            ExtrasCatalog::Savory => &self.savory_extras,
            ExtrasCatalog::Sweet => &self.sweet_extras,
        }
    }

    /// Ids of every item in the given category.
    pub fn ids_in_category(&self, category: &str) -> FxHashSet<ItemId> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.id)
            .collect()
    }

    /// Group items by category, in first-seen order, with display strings resolved.
    pub fn categories(&self, translations: &Translations) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::new();
        let mut positions: FxHashMap<&str, usize> = FxHashMap::default();

        for item in &self.items {
            let entry = MenuEntry {
                id: item.id,
                name: translations
                    .lookup(&item.name)
                    .unwrap_or(item.name.as_str())
                    .to_string(),
                description: translations
                    .describe(&item.name, item.description.as_deref())
                    .map(ToString::to_string),
                price: item.price,
            };

            let position = *positions.entry(item.category.as_str()).or_insert_with(|| {
                categories.push(Category {
                    key: item.category.clone(),
                    label: translations.category_label(&item.category),
                    items: Vec::new(),
                });

                categories.len() - 1
            });

            if let Some(category) = categories.get_mut(position) {
                category.items.push(entry);
            }
        }

        categories
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_extras(catalog: ExtrasCatalog, extras: &[Ingredient]) -> Result<(), CatalogError> {
    let mut seen = FxHashSet::default();

    for ingredient in extras {
        if ingredient.price < Decimal::ZERO {
            return Err(CatalogError::NegativePrice(ingredient.name.clone()));
        }

        if !seen.insert(ingredient.name.as_str()) {
            return Err(CatalogError::DuplicateIngredient {
                catalog,
                name: ingredient.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn item(id: ItemId, name: &str, category: &str, price: Decimal) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price,
            description: None,
        }
    }

    #[test]
    fn find_by_id_returns_item() -> TestResult {
        let catalog = MenuCatalog::new(
            vec![
                item(1, "ESPRESSO", "COFFEES", Decimal::new(180, 2)),
                item(15, "COCA_COLA", "SOFT_DRINKS", Decimal::new(200, 2)),
            ],
            Vec::new(),
            Vec::new(),
        )?;

        assert_eq!(catalog.find_by_id(15).map(|i| i.name.as_str()), Some("COCA_COLA"));
        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[test]
    fn find_by_id_unknown_is_none() -> TestResult {
        let catalog = MenuCatalog::embedded()?;

        assert!(catalog.find_by_id(9_999).is_none());

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = MenuCatalog::new(
            vec![
                item(1, "A", "X", Decimal::ONE),
                item(1, "B", "X", Decimal::ONE),
            ],
            Vec::new(),
            Vec::new(),
        );

        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let result = MenuCatalog::new(
            vec![item(1, "A", "X", Decimal::new(-1, 0))],
            Vec::new(),
            Vec::new(),
        );

        assert!(matches!(result, Err(CatalogError::NegativePrice(_))));
    }

    #[test]
    fn duplicate_extras_are_rejected() {
        let result = MenuCatalog::new(
            Vec::new(),
            Vec::new(),
            vec![
                Ingredient::new("Nutella", Decimal::ONE),
                Ingredient::new("Nutella", Decimal::ONE),
            ],
        );

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateIngredient {
                catalog: ExtrasCatalog::Sweet,
                ..
            })
        ));
    }

    #[test]
    fn list_all_preserves_catalog_order() -> TestResult {
        let catalog = MenuCatalog::embedded()?;
        let ids: Vec<ItemId> = catalog.list_all().iter().map(|i| i.id).collect();

        assert_eq!(ids.first(), Some(&1));
        assert!(ids.windows(2).all(|pair| pair.first() != pair.get(1)));

        Ok(())
    }

    #[test]
    fn categories_group_in_first_seen_order() -> TestResult {
        let catalog = MenuCatalog::new(
            vec![
                item(1, "ESPRESSO", "COFFEES", Decimal::ONE),
                item(15, "COCA_COLA", "SOFT_DRINKS", Decimal::ONE),
                item(2, "CAPPUCCINO", "COFFEES", Decimal::ONE),
            ],
            Vec::new(),
            Vec::new(),
        )?;

        let categories = catalog.categories(&Translations::empty());
        let keys: Vec<&str> = categories.iter().map(|c| c.key.as_str()).collect();

        assert_eq!(keys, ["COFFEES", "SOFT_DRINKS"]);
        assert_eq!(categories.first().map(|c| c.items.len()), Some(2));
        assert_eq!(categories.get(1).map(|c| c.label.as_str()), Some("Soft Drinks"));

        Ok(())
    }

    #[test]
    fn embedded_catalog_has_both_extras_catalogs() -> TestResult {
        let catalog = MenuCatalog::embedded()?;

        assert!(!catalog.extras(ExtrasCatalog::Savory).is_empty());
        assert!(!catalog.extras(ExtrasCatalog::Sweet).is_empty());

        Ok(())
    }
}
