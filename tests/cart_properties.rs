//! Integration tests for the cart aggregate

use std::sync::Arc;

use rust_decimal::Decimal;
use testresult::TestResult;

use storefront::{
    cart::{CART_STORAGE_KEY, Cart, CartLine},
    menu::{Ingredient, ItemId},
    options::{Size, Sweetness},
    storage::{FileStorage, Storage},
};

fn freddo(size: Size, sweetness: Sweetness) -> CartLine {
    CartLine {
        size: Some(size),
        sweetness: Some(sweetness),
        ..CartLine::new(3, "Φρέντο Εσπρέσο", Decimal::new(250, 2))
    }
}

fn toast(extras: &[(&str, i64)]) -> CartLine {
    CartLine {
        ingredients: extras
            .iter()
            .map(|(name, cents)| Ingredient::new(*name, Decimal::new(*cents, 2)))
            .collect(),
        ..CartLine::new(51, "Τοστ", Decimal::new(250, 2))
    }
}

fn from_scratch_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| {
            let extras: Decimal = line.ingredients.iter().map(|i| i.price).sum();

            (line.base_price + extras) * Decimal::from(line.quantity)
        })
        .sum()
}

#[test]
fn total_matches_from_scratch_sum_after_every_mutation() {
    let mut cart = Cart::in_memory();

    let steps: Vec<Box<dyn Fn(&mut Cart)>> = vec![
        Box::new(|cart: &mut Cart| cart.add(freddo(Size::Double, Sweetness::Sweet))),
        Box::new(|cart: &mut Cart| {
            cart.add(toast(&[("Τυρί", 50), ("Ζαμπόν", 70)]).with_quantity(3))
        }),
        Box::new(|cart: &mut Cart| {
            cart.add(freddo(Size::Double, Sweetness::Sweet).with_quantity(2))
        }),
        Box::new(|cart: &mut Cart| cart.add(toast(&[]))),
        Box::new(|cart: &mut Cart| cart.remove(99)),
        Box::new(|cart: &mut Cart| cart.remove(1)),
        Box::new(|cart: &mut Cart| cart.add(toast(&[("Τυρί", 50)]))),
    ];

    for step in steps {
        step(&mut cart);

        assert_eq!(cart.total(), from_scratch_total(&cart.items()));
    }
}

#[test]
fn same_line_adds_merge_quantities() {
    let mut cart = Cart::in_memory();

    cart.add(freddo(Size::Single, Sweetness::Medium).with_quantity(2));
    cart.add(freddo(Size::Single, Sweetness::Medium).with_quantity(5));

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(0).map(|line| line.quantity), Some(7));
}

#[test]
fn differing_options_stay_separate() {
    let mut cart = Cart::in_memory();

    cart.add(freddo(Size::Single, Sweetness::Medium));
    cart.add(freddo(Size::Single, Sweetness::Sweet));
    cart.add(freddo(Size::Double, Sweetness::Medium));

    assert_eq!(cart.len(), 3);
}

#[test]
fn out_of_range_remove_leaves_cart_unchanged() {
    let mut cart = Cart::in_memory();
    cart.add(toast(&[("Τυρί", 50)]));

    let before = cart.items();

    cart.remove(1);
    cart.remove(usize::MAX);

    assert_eq!(cart.items(), before);
}

#[test]
fn persist_and_reload_reproduces_the_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path()));

    let mut cart = Cart::load(Arc::clone(&storage));

    cart.add(freddo(Size::Double, Sweetness::Plain));
    cart.add(toast(&[("Μπέικον", 80), ("Τυρί", 50)]).with_quantity(2));
    cart.add(CartLine {
        comments: "χωρίς πάγο".to_string(),
        ..CartLine::new(15, "Coca-Cola", Decimal::new(200, 2))
    });

    let reloaded = Cart::load(Arc::clone(&storage));

    assert_eq!(reloaded.items(), cart.items());
    assert_eq!(reloaded.total(), cart.total());

    Ok(())
}

#[test]
fn reload_keeps_fractional_prices_and_merging() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path()));

    let priced = |id: ItemId, cents: i64| {
        CartLine::new(id, format!("item {id}"), Decimal::new(cents, 2))
    };
    let lines = [
        priced(1, 180),
        priced(3, 320).with_quantity(3),
        toast(&[("Ζαμπόν", 70), ("Αλάτι", 10)]),
        priced(13, 1999),
        freddo(Size::Double, Sweetness::Sweet).with_quantity(2),
        priced(52, 1),
        toast(&[("Τυρί", 55)]).with_quantity(4),
    ];

    let mut cart = Cart::load(Arc::clone(&storage));

    for line in &lines {
        cart.add(line.clone());
    }

    let mut reloaded = Cart::load(Arc::clone(&storage));

    assert_eq!(reloaded.len(), 7);
    assert_eq!(reloaded.items(), cart.items());
    assert_eq!(reloaded.total(), cart.total());

    reloaded.add(toast(&[("Ζαμπόν", 70), ("Αλάτι", 10)]));

    assert_eq!(reloaded.len(), 7);
    assert_eq!(reloaded.get(2).map(|line| line.quantity), Some(2));

    Ok(())
}

#[test]
fn clear_persists_an_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path()));

    let mut cart = Cart::load(Arc::clone(&storage));
    cart.add(toast(&[]));
    cart.clear();

    assert!(Cart::load(Arc::clone(&storage)).is_empty());
    assert_eq!(storage.read(CART_STORAGE_KEY)?.as_deref(), Some("[]"));

    Ok(())
}

#[test]
fn corrupt_blob_loads_empty() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path()));

    storage.write(CART_STORAGE_KEY, "{\"not\": \"a cart\"")?;

    assert!(Cart::load(storage).is_empty());

    Ok(())
}

#[test]
fn reads_carts_written_by_earlier_clients() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path()));

    storage.write(
        CART_STORAGE_KEY,
        r#"[{"id":4,"name":"Freddo Cappuccino","basePrice":3.5,"size":"double","sweetness":"medium","ingredients":[],"comments":"","quantity":2}]"#,
    )?;

    let cart = Cart::load(storage);

    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total(), Decimal::new(700, 2));

    Ok(())
}
