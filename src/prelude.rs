//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CART_STORAGE_KEY, Cart, CartLine,
        receipt::{ReceiptError, write_receipt},
    },
    checkout::{
        AddressType, CheckoutOutcome, CheckoutPipeline, DeliveryAddress, DeliveryWindow,
        HttpOrderGateway, LatLng, OrderGateway, OrderPayload, SubmitError, ValidationError, View,
    },
    i18n::Translations,
    maps::{MapsError, MapsLoader, MapsSettings},
    menu::{CatalogError, Ingredient, ItemId, MenuCatalog, MenuItem},
    options::{ExtrasCatalog, OptionProfile, OptionRules, Size, Sweetness},
    session::{CustomizationSession, SessionError, SessionState},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    storefront::{Storefront, StorefrontError},
};
