//! Customer details and address validation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{Storage, load_json};

/// Storage key holding the last submitted address form.
pub const ADDRESS_STORAGE_KEY: &str = "checkout_address";

/// Shortest accepted manually entered address.
pub const MIN_ADDRESS_CHARS: usize = 3;

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 9..=14;

/// Reasons a checkout request is rejected before anything leaves the device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Manual address shorter than [`MIN_ADDRESS_CHARS`]
    #[error("Please enter a delivery address of at least {MIN_ADDRESS_CHARS} characters")]
    AddressTooShort,

    /// Name left blank
    #[error("Please enter your name")]
    MissingName,

    /// Phone number not 9 to 14 digits with an optional leading `+`
    #[error("Please enter a valid phone number")]
    InvalidPhone,

    /// Map mode without a picked location
    #[error("Please pick your location on the map")]
    MissingLocation,

    /// Nothing to order
    #[error("Your cart is empty")]
    EmptyCart,

    /// Order total below the configured minimum
    #[error("Minimum order is €{minimum}, your cart totals €{total}")]
    BelowMinimum {
        /// Configured minimum
        minimum: Decimal,

        /// Current cart total
        total: Decimal,
    },
}

/// How the delivery address was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Typed in by the customer
    #[default]
    Manual,

    /// Picked on a map
    Map,
}

/// A point picked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,
}

/// The address form: where to deliver and whom to call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Street address; optional in map mode
    #[serde(default)]
    pub address: String,

    /// Floor / bell details
    #[serde(default)]
    pub floor: String,

    /// Customer name
    #[serde(default)]
    pub name: String,

    /// Contact phone
    #[serde(default)]
    pub phone: String,

    /// Entry mode
    #[serde(default)]
    pub address_type: AddressType,

    /// Picked location, map mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
}

impl DeliveryAddress {
    /// A manually entered address.
    pub fn manual(
        address: impl Into<String>,
        floor: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            floor: floor.into(),
            name: name.into(),
            phone: phone.into(),
            address_type: AddressType::Manual,
            location: None,
        }
    }

    /// Switch to map mode with the given location.
    #[must_use]
    pub fn at(mut self, location: LatLng) -> Self {
        self.address_type = AddressType::Map;
        self.location = Some(location);
        self
    }

    /// Trim the text fields and validate them.
    ///
    /// In manual mode the address must be at least [`MIN_ADDRESS_CHARS`]
    /// characters; in map mode the address is optional but a location is
    /// required. Manual entries never carry a location.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking address, name
    /// and phone in that order.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let address = Self {
            address: self.address.trim().to_string(),
            floor: self.floor.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            location: match self.address_type {
                AddressType::Manual => None,
                AddressType::Map => self.location,
            },
            ..self
        };

        match address.address_type {
            AddressType::Manual if address.address.chars().count() < MIN_ADDRESS_CHARS => {
                return Err(ValidationError::AddressTooShort);
            }
            AddressType::Map if address.location.is_none() => {
                return Err(ValidationError::MissingLocation);
            }
            AddressType::Manual | AddressType::Map => {}
        }

        if address.name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        if !is_valid_phone(&address.phone) {
            return Err(ValidationError::InvalidPhone);
        }

        Ok(address)
    }
}

/// Whether `phone` is 9 to 14 ASCII digits, optionally preceded by `+`.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    PHONE_DIGITS.contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// The address form saved by the last checkout attempt, for prefilling.
pub fn last_address(storage: &dyn Storage) -> Option<DeliveryAddress> {
    load_json(storage, ADDRESS_STORAGE_KEY)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn valid() -> DeliveryAddress {
        DeliveryAddress::manual("Ermou 12", "2nd", "Maria", "+306912345678")
    }

    #[test]
    fn valid_manual_address_passes_and_is_trimmed() -> TestResult {
        let address = DeliveryAddress {
            name: "  Maria ".to_string(),
            ..valid()
        }
        .validated()?;

        assert_eq!(address.name, "Maria");

        Ok(())
    }

    #[test]
    fn short_address_is_rejected() {
        let address = DeliveryAddress {
            address: " ab ".to_string(),
            ..valid()
        };

        assert_eq!(address.validated(), Err(ValidationError::AddressTooShort));
    }

    #[test]
    fn blank_name_is_rejected() {
        let address = DeliveryAddress {
            name: "   ".to_string(),
            ..valid()
        };

        assert_eq!(address.validated(), Err(ValidationError::MissingName));
    }

    #[test]
    fn phone_rules() {
        assert!(is_valid_phone("6912345678"));
        assert!(is_valid_phone("+306912345678"));
        assert!(is_valid_phone("123456789"));
        assert!(!is_valid_phone("12345678"));
        assert!(!is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("69 1234 5678"));
        assert!(!is_valid_phone("++6912345678"));
        assert!(!is_valid_phone("+"));
    }

    #[test]
    fn map_mode_needs_location_but_not_address() -> TestResult {
        let without_location = DeliveryAddress {
            address: String::new(),
            address_type: AddressType::Map,
            ..valid()
        };

        assert_eq!(
            without_location.clone().validated(),
            Err(ValidationError::MissingLocation)
        );

        let picked = without_location
            .at(LatLng {
                lat: 37.97,
                lng: 23.72,
            })
            .validated()?;

        assert_eq!(picked.address_type, AddressType::Map);
        assert!(picked.location.is_some());

        Ok(())
    }

    #[test]
    fn manual_mode_drops_stray_location() -> TestResult {
        let address = DeliveryAddress {
            location: Some(LatLng { lat: 1.0, lng: 2.0 }),
            ..valid()
        }
        .validated()?;

        assert_eq!(address.location, None);

        Ok(())
    }

    #[test]
    fn serializes_with_address_type() -> TestResult {
        let json = serde_json::to_value(valid())?;

        assert_eq!(json["addressType"], "manual");
        assert!(json.get("location").is_none());

        Ok(())
    }

    #[test]
    fn below_minimum_message_shows_amounts() {
        let message = ValidationError::BelowMinimum {
            minimum: Decimal::new(10, 0),
            total: Decimal::new(450, 2),
        }
        .to_string();

        assert!(message.contains("€10"), "unexpected message: {message}");
        assert!(message.contains("€4.50"), "unexpected message: {message}");
    }
}
