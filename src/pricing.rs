//! Prices

use rust_decimal::Decimal;
use rusty_money::{Money, iso};

use crate::{cart::CartLine, menu::Ingredient, options::Size};

/// Surcharge for a double serving.
pub const DOUBLE_SURCHARGE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Item price plus the size surcharge, if any.
pub fn base_price(item_price: Decimal, size: Size) -> Decimal {
    match size {
        Size::Single => item_price,
        Size::Double => item_price + DOUBLE_SURCHARGE,
    }
}

/// Sum of ingredient prices.
pub fn extras_total<'a>(ingredients: impl IntoIterator<Item = &'a Ingredient>) -> Decimal {
    ingredients
        .into_iter()
        .map(|ingredient| ingredient.price)
        .sum()
}

/// Calculates the total price of a list of cart lines.
pub fn total_price(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Format an amount in the storefront currency.
pub fn format_price(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::EUR).to_string()
}
