//! Cart lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    menu::{Ingredient, ItemId},
    options::{Size, Sweetness},
    pricing::extras_total,
};

fn one() -> u32 {
    1
}

/// One distinct item configuration and how many of it were ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Menu item id
    #[serde(rename = "id")]
    pub item_id: ItemId,

    /// Display name at the time the line was added
    pub name: String,

    /// Item price including the size surcharge
    pub base_price: Decimal,

    /// Chosen sweetness, for items that offer one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweetness: Option<Sweetness>,

    /// Chosen size, for items that offer one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    /// Extras in selection order (savory, sweet, then bundled drinks)
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,

    /// Free-text comments
    #[serde(default)]
    pub comments: String,

    /// Number ordered, at least one
    #[serde(default = "one")]
    pub quantity: u32,
}

impl CartLine {
    /// A plain line for an item with no customization.
    pub fn new(item_id: ItemId, name: impl Into<String>, base_price: Decimal) -> Self {
        Self {
            item_id,
            name: name.into(),
            base_price,
            sweetness: None,
            size: None,
            ingredients: Vec::new(),
            comments: String::new(),
            quantity: 1,
        }
    }

    /// Set the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Whether `other` describes the same configuration, so that adding it
    /// should bump this line's quantity instead of appending.
    pub fn is_same_line(&self, other: &CartLine) -> bool {
        self.item_id == other.item_id
            && self.sweetness == other.sweetness
            && self.size == other.size
            && self.comments == other.comments
            && self.ingredients == other.ingredients
    }

    /// Price of one unit: base price plus extras.
    pub fn unit_price(&self) -> Decimal {
        self.base_price + extras_total(&self.ingredients)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    /// Comma-separated extras names, for display.
    pub fn extras_label(&self) -> String {
        self.ingredients
            .iter()
            .map(|ingredient| ingredient.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
