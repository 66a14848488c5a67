//! Cart receipt

use std::{fmt::Write as _, io};

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    pricing::format_price,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The cart has no lines to print
    #[error("Cart is empty")]
    Empty,

    /// IO error
    #[error("IO error")]
    IO,
}

/// Writes a cart summary table followed by the order total.
///
/// # Errors
///
/// Returns [`ReceiptError::Empty`] for an empty cart, or [`ReceiptError::IO`]
/// if the output cannot be written.
pub fn write_receipt(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return Err(ReceiptError::Empty);
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Extras", "Unit", "Qty", "Total"]);

    for (index, line) in cart.iter().enumerate() {
        builder.push_record(line_record(index, line));
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;
    writeln!(out, " Total: {}", format_price(cart.total()))
        .map_err(|_err| ReceiptError::IO)
}

fn line_record(index: usize, line: &CartLine) -> [String; 6] {
    let mut item = line.name.clone();

    if let Some(size) = line.size {
        _ = write!(item, " ({size})");
    }

    if let Some(sweetness) = line.sweetness {
        _ = write!(item, "\n{sweetness}");
    }

    if !line.comments.is_empty() {
        _ = write!(item, "\n\"{}\"", line.comments);
    }

    [
        format!("#{:<3}", index + 1),
        item,
        line.extras_label(),
        format_price(line.unit_price()),
        line.quantity.to_string(),
        format_price(line.line_total()),
    ]
}
