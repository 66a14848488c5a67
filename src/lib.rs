//! Storefront
//!
//! Ordering core for a food and coffee storefront: menu catalog, per-item
//! option rules, item customization, a persisted cart, and order submission
//! gated by validation and delivery hours.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod i18n;
pub mod maps;
pub mod menu;
pub mod observability;
pub mod options;
pub mod prelude;
pub mod pricing;
pub mod session;
pub mod storage;
pub mod storefront;
