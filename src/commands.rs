//! Command handlers

use std::{
    io::{self, Write},
    sync::Arc,
};

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use storefront::{
    cart::{
        Cart,
        receipt::{ReceiptError, write_receipt},
    },
    checkout::{
        CheckoutPipeline, DeliveryAddress, DeliveryWindow, LatLng, SubmitError, last_address,
    },
    config::{AddArgs, CheckoutArgs, Command, StorefrontConfig},
    maps::MapsLoader,
    menu::{ItemId, search::filter_extras},
    options::ExtrasCatalog,
    pricing::{DOUBLE_SURCHARGE, format_price},
    session::SessionError,
    storage::Storage,
    storefront::{Storefront, StorefrontError},
};

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    /// Reference data failed to load
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Customization was rejected
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Receipt could not be written
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Order gateway could not be built
    #[error(transparent)]
    Gateway(#[from] SubmitError),

    /// Delivery time zone is unavailable
    #[error("time zone error: {0}")]
    TimeZone(#[from] jiff::Error),

    /// Output could not be written
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// A bundle drink quantity was not accepted
    #[error("cannot add {quantity} of drink {id}; the bundle includes {required}")]
    DrinkRejected {
        /// Drink id
        id: ItemId,

        /// Requested quantity
        quantity: u32,

        /// Drinks the bundle includes
        required: u32,
    },

    /// Map mode requested without a configured provider
    #[error("map-based address entry is not configured")]
    MapsDisabled,

    /// The checkout attempt did not submit an order
    #[error("{0}")]
    NotSubmitted(String),
}

pub(crate) async fn run(config: StorefrontConfig) -> Result<(), CommandError> {
    let storefront = config.catalog.load()?;
    let storage = config.storage.open();
    let window = DeliveryWindow::athens()?;
    let mut out = io::stdout();

    match config.command {
        Command::Menu => show_menu(&mut out, &storefront, &window),
        Command::Item { id } => show_item(&mut out, &storefront, id),
        Command::Extras { id, query } => search_extras(&mut out, &storefront, id, &query),
        Command::Add(args) => add_to_cart(&mut out, &storefront, storage, &args),
        Command::Cart => show_cart(&mut out, &Cart::load(storage)),
        Command::Remove { line } => {
            let mut cart = Cart::load(storage);

            if let Some(index) = line.checked_sub(1) {
                cart.remove(index);
            }

            show_cart(&mut out, &cart)
        }
        Command::Clear => {
            Cart::load(storage).clear();
            writeln!(out, "Cart cleared.")?;

            Ok(())
        }
        Command::Checkout(args) => {
            let provider = config.provider.load();
            let maps = MapsLoader::http(provider.maps_settings());
            let pipeline = CheckoutPipeline::new(
                Arc::clone(&storage),
                Arc::new(config.order.gateway()?),
                window,
            )
            .with_minimum_order(config.order.minimum_order);

            checkout(&mut out, storage, &pipeline, &maps, args).await
        }
    }
}

fn show_menu(
    out: &mut impl Write,
    storefront: &Storefront,
    window: &DeliveryWindow,
) -> Result<(), CommandError> {
    if !window.is_open(Timestamp::now()) {
        warn!("started outside delivery hours");
        writeln!(out, "{}\n", window.notice())?;
    }

    for category in storefront.menu() {
        writeln!(out, "{}", category.label)?;

        for entry in &category.items {
            writeln!(
                out,
                "  {:>4}  {:<32} {:>8}",
                entry.id,
                entry.name,
                format_price(entry.price)
            )?;

            if let Some(description) = &entry.description {
                writeln!(out, "        {description}")?;
            }
        }

        writeln!(out)?;
    }

    Ok(())
}

fn show_item(
    out: &mut impl Write,
    storefront: &Storefront,
    id: ItemId,
) -> Result<(), CommandError> {
    let session = storefront.open_item(id)?;
    let profile = session.profile();

    writeln!(
        out,
        "{} {}",
        session.display_name(),
        format_price(session.item().price)
    )?;

    if profile.size_selectable {
        writeln!(out, "  size: single, double (+{})", format_price(DOUBLE_SURCHARGE))?;
    }

    if profile.sweetness_selectable {
        writeln!(out, "  sweetness: plain, medium, sweet")?;
    }

    for catalog in [ExtrasCatalog::Savory, ExtrasCatalog::Sweet] {
        let extras = session.offered_extras(catalog);

        if !extras.is_empty() {
            writeln!(out, "  {catalog} extras:")?;

            for ingredient in extras {
                writeln!(
                    out,
                    "    {:<24} +{}",
                    ingredient.name,
                    format_price(ingredient.price)
                )?;
            }
        }
    }

    if let Some(bundle) = &profile.drink_bundle {
        writeln!(out, "  choose {} drink(s):", bundle.required_count)?;

        for drink in session.drinks() {
            writeln!(out, "    {:>4}  {}", drink.id, drink.name)?;
        }
    }

    if profile.is_plain() {
        writeln!(out, "  no options")?;
    }

    Ok(())
}

fn search_extras(
    out: &mut impl Write,
    storefront: &Storefront,
    id: ItemId,
    query: &str,
) -> Result<(), CommandError> {
    let session = storefront.open_item(id)?;

    for catalog in [ExtrasCatalog::Savory, ExtrasCatalog::Sweet] {
        for ingredient in filter_extras(session.offered_extras(catalog), query) {
            writeln!(
                out,
                "{:<7} {:<24} +{}",
                catalog.to_string(),
                ingredient.name,
                format_price(ingredient.price)
            )?;
        }
    }

    Ok(())
}

fn add_to_cart(
    out: &mut impl Write,
    storefront: &Storefront,
    storage: Arc<dyn Storage>,
    args: &AddArgs,
) -> Result<(), CommandError> {
    let mut session = storefront.open_item(args.id)?;

    if let Some(size) = args.size
        && !session.set_size(size)?
    {
        writeln!(
            out,
            "{} has no size choice; ignoring --size",
            session.display_name()
        )?;
    }

    if let Some(sweetness) = args.sweetness
        && !session.set_sweetness(sweetness)?
    {
        writeln!(
            out,
            "{} has no sweetness choice; ignoring --sweetness",
            session.display_name()
        )?;
    }

    for name in &args.extras {
        session.toggle_extra(ExtrasCatalog::Savory, name)?;
    }

    for name in &args.sweet_extras {
        session.toggle_extra(ExtrasCatalog::Sweet, name)?;
    }

    for &(id, quantity) in &args.drinks {
        let delta = i32::try_from(quantity).unwrap_or(i32::MAX);

        if !session.adjust_drink_quantity(id, delta)? {
            return Err(CommandError::DrinkRejected {
                id,
                quantity,
                required: session.required_drinks(),
            });
        }
    }

    session.set_comments(args.comments.as_str())?;

    let line = session.finalize()?.with_quantity(args.quantity);
    let mut cart = Cart::load(storage);

    info!(item = line.item_id, quantity = line.quantity, "adding to cart");

    writeln!(
        out,
        "Added {} x {} ({})",
        line.quantity.max(1),
        line.name,
        format_price(line.unit_price())
    )?;

    cart.add(line);

    writeln!(
        out,
        "Cart: {} item(s), {}",
        cart.item_count(),
        format_price(cart.total())
    )?;

    Ok(())
}

fn show_cart(out: &mut impl Write, cart: &Cart) -> Result<(), CommandError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty.")?;

        return Ok(());
    }

    write_receipt(&mut *out, cart)?;
    writeln!(out, " Items: {}", cart.item_count())?;

    Ok(())
}

async fn checkout(
    out: &mut impl Write,
    storage: Arc<dyn Storage>,
    pipeline: &CheckoutPipeline,
    maps: &MapsLoader,
    args: CheckoutArgs,
) -> Result<(), CommandError> {
    let saved = last_address(storage.as_ref()).unwrap_or_default();
    let prefill = |given: String, saved: String| {
        if given.trim().is_empty() { saved } else { given }
    };

    let mut address = DeliveryAddress::manual(
        args.address,
        prefill(args.floor, saved.floor),
        prefill(args.name, saved.name),
        prefill(args.phone, saved.phone),
    );

    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        if !maps.is_enabled() {
            return Err(CommandError::MapsDisabled);
        }

        let location = LatLng { lat, lng };

        if address.address.trim().is_empty()
            && let Some(described) = maps.describe_location(location).await
        {
            address.address = described;
        }

        address = address.at(location);
    } else if address.address.trim().is_empty() {
        address.address = saved.address;
    }

    let cart = Cart::load(storage);
    let outcome = pipeline.submit(&cart, address).await;

    if !outcome.is_submitted() {
        return Err(CommandError::NotSubmitted(outcome.notice()));
    }

    writeln!(out, "{}", outcome.notice())?;

    Ok(())
}
