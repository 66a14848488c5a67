//! Option Rules
//!
//! Which customization axes apply to which menu item. Every rule lives in
//! one lookup table so the whole rule set can be read and tested in one place.

use std::{fmt, str::FromStr};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::menu::{ItemId, MenuCatalog};

/// Category whose items offer a sweetness choice.
pub const COFFEE_CATEGORY: &str = "COFFEES";

/// Items that can be ordered as a double.
const SIZE_ELIGIBLE: [ItemId; 5] = [3, 4, 5, 6, 13];

/// Items that offer the savory extras catalog.
const SAVORY_EXTRAS: [ItemId; 3] = [51, 52, 101];

/// Items that offer the sweet extras catalog.
const SWEET_EXTRAS: [ItemId; 2] = [53, 106];

/// Bundle items and how many drinks each one includes.
const DRINK_BUNDLES: [(ItemId, u32); 2] = [(200, 2), (202, 1)];

/// Drinks offered inside every bundle, in display order.
const BUNDLE_DRINKS: [ItemId; 10] = [15, 16, 17, 18, 19, 20, 21, 22, 24, 31];

/// Drink ids offered by a bundle.
pub type DrinkIds = SmallVec<[ItemId; 10]>;

/// Error parsing a size or sweetness from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseOptionError {
    /// Unrecognised size
    #[error("unknown size `{0}` (expected single or double)")]
    Size(String),

    /// Unrecognised sweetness
    #[error("unknown sweetness `{0}` (expected plain, medium or sweet)")]
    Sweetness(String),
}

/// Serving size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    /// Regular serving
    #[default]
    Single,

    /// Double serving, charged with a surcharge
    Double,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Single => f.write_str("single"),
            Size::Double => f.write_str("double"),
        }
    }
}

impl FromStr for Size {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Size::Single),
            "double" => Ok(Size::Double),
            _ => Err(ParseOptionError::Size(s.to_string())),
        }
    }
}

/// Sugar level for coffees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweetness {
    /// No sugar
    #[default]
    Plain,

    /// Medium sugar
    Medium,

    /// Sweet
    Sweet,
}

impl fmt::Display for Sweetness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sweetness::Plain => f.write_str("plain"),
            Sweetness::Medium => f.write_str("medium"),
            Sweetness::Sweet => f.write_str("sweet"),
        }
    }
}

impl FromStr for Sweetness {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(Sweetness::Plain),
            "medium" => Ok(Sweetness::Medium),
            "sweet" => Ok(Sweetness::Sweet),
            _ => Err(ParseOptionError::Sweetness(s.to_string())),
        }
    }
}

/// The two disjoint extras catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtrasCatalog {
    /// Savory add-ons (cheese, ham, ...)
    Savory,

    /// Sweet add-ons (spreads, fruit, ...)
    Sweet,
}

impl fmt::Display for ExtrasCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtrasCatalog::Savory => f.write_str("savory"),
            ExtrasCatalog::Sweet => f.write_str("sweet"),
        }
    }
}

/// A fixed-size selection of complimentary drinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkBundle {
    /// Exact number of drinks that must be picked
    pub required_count: u32,

    /// Drinks that may be picked, in display order
    pub eligible_drink_ids: DrinkIds,
}

/// The customization axes that apply to one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent customization axis"
)]
pub struct OptionProfile {
    /// Single/double choice is offered
    pub size_selectable: bool,

    /// Sweetness choice is offered
    pub sweetness_selectable: bool,

    /// Savory extras are offered
    pub savory_extras_visible: bool,

    /// Sweet extras are offered
    pub sweet_extras_visible: bool,

    /// Bundled drinks, when the item includes some
    pub drink_bundle: Option<DrinkBundle>,
}

impl OptionProfile {
    /// Whether the given extras catalog is offered.
    pub fn offers_extras(&self, catalog: ExtrasCatalog) -> bool {
        match catalog {
            ExtrasCatalog::Savory => self.savory_extras_visible,
            ExtrasCatalog::Sweet => self.sweet_extras_visible,
        }
    }

    /// An item with no customization beyond quantity.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Lookup table from item id to [`OptionProfile`].
#[derive(Debug, Clone, Default)]
pub struct OptionRules {
    size_eligible: FxHashSet<ItemId>,
    sweetness_eligible: FxHashSet<ItemId>,
    savory_extras: FxHashSet<ItemId>,
    sweet_extras: FxHashSet<ItemId>,
    drink_bundles: FxHashMap<ItemId, u32>,
    bundle_drinks: DrinkIds,
}

impl OptionRules {
    /// The storefront rule set, bound to a catalog.
    ///
    /// Sweetness applies to every item of [`COFFEE_CATEGORY`]; bundle drinks
    /// missing from the catalog are left out.
    pub fn for_catalog(catalog: &MenuCatalog) -> Self {
        Self {
            size_eligible: SIZE_ELIGIBLE.into_iter().collect(),
            sweetness_eligible: catalog.ids_in_category(COFFEE_CATEGORY),
            savory_extras: SAVORY_EXTRAS.into_iter().collect(),
            sweet_extras: SWEET_EXTRAS.into_iter().collect(),
            drink_bundles: DRINK_BUNDLES.into_iter().collect(),
            bundle_drinks: BUNDLE_DRINKS
                .into_iter()
                .filter(|id| catalog.find_by_id(*id).is_some())
                .collect(),
        }
    }

    /// Resolve the profile for an item. Unknown ids resolve to a plain profile.
    pub fn resolve(&self, item: ItemId) -> OptionProfile {
        OptionProfile {
            size_selectable: self.size_eligible.contains(&item),
            sweetness_selectable: self.sweetness_eligible.contains(&item),
            savory_extras_visible: self.savory_extras.contains(&item),
            sweet_extras_visible: self.sweet_extras.contains(&item),
            drink_bundle: self
                .drink_bundles
                .get(&item)
                .map(|required_count| DrinkBundle {
                    required_count: *required_count,
                    eligible_drink_ids: self.bundle_drinks.clone(),
                }),
        }
    }
}
