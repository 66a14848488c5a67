//! Storefront configuration
//!
//! Every setting can be given as a command-line flag or an environment
//! variable; a `.env` file in the working directory is loaded first.

use clap::{Parser, Subcommand};

mod catalog;
mod observability;
mod order;
mod provider;
mod storage;

pub use catalog::CatalogConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use order::OrderConfig;
pub use provider::{ConfigError, ProviderConfig, ProviderConfigArgs};
pub use storage::StorageConfig;

/// Storefront configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront ordering core", long_about = None)]
pub struct StorefrontConfig {
    /// Local persistence settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Menu and translation sources.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Remote order endpoint settings.
    #[command(flatten)]
    pub order: OrderConfig,

    /// Optional maps provider settings.
    #[command(flatten)]
    pub provider: ProviderConfigArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Storefront actions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the menu grouped by category
    Menu,

    /// Show the options an item offers
    Item {
        /// Menu item id
        id: u32,
    },

    /// Search an item's extras, ignoring case and accents
    Extras {
        /// Menu item id
        id: u32,

        /// Search text; empty lists everything
        #[arg(default_value = "")]
        query: String,
    },

    /// Customize an item and add it to the cart
    Add(AddArgs),

    /// Show the cart
    Cart,

    /// Remove a cart line by its 1-based position
    Remove {
        /// Line number as shown by `cart`
        line: usize,
    },

    /// Empty the cart
    Clear,

    /// Submit the cart as an order
    Checkout(CheckoutArgs),
}

/// Customization choices for `add`.
#[derive(Debug, clap::Args)]
pub struct AddArgs {
    /// Menu item id
    pub id: u32,

    /// Size (single, double)
    #[arg(long)]
    pub size: Option<crate::options::Size>,

    /// Sweetness (plain, medium, sweet)
    #[arg(long)]
    pub sweetness: Option<crate::options::Sweetness>,

    /// Savory extra by name; repeatable
    #[arg(long = "extra")]
    pub extras: Vec<String>,

    /// Sweet extra by name; repeatable
    #[arg(long = "sweet-extra")]
    pub sweet_extras: Vec<String>,

    /// Bundle drink as `ID=QTY` or `ID`; repeatable
    #[arg(long = "drink", value_parser = parse_drink)]
    pub drinks: Vec<(u32, u32)>,

    /// Free-text comments
    #[arg(long, default_value = "")]
    pub comments: String,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
}

/// Customer details for `checkout`.
#[derive(Debug, clap::Args)]
pub struct CheckoutArgs {
    /// Delivery address; optional when a location is given
    #[arg(long, default_value = "")]
    pub address: String,

    /// Floor / bell
    #[arg(long, default_value = "")]
    pub floor: String,

    /// Customer name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Contact phone
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Picked latitude (map mode)
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Picked longitude (map mode)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

fn parse_drink(value: &str) -> Result<(u32, u32), String> {
    let (id, quantity) = value.split_once('=').unwrap_or((value, "1"));

    let id = id
        .trim()
        .parse()
        .map_err(|error| format!("invalid drink id `{id}`: {error}"))?;

    let quantity = quantity
        .trim()
        .parse()
        .map_err(|error| format!("invalid drink quantity `{quantity}`: {error}"))?;

    Ok((id, quantity))
}
