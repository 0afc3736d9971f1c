// A line item is one priced product in a PayPal transaction item list.
// Currency is captured from the ledger when the item is added, so a later
// `set_currency` never re-labels items that are already in the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Currency, Result};

/// Caller-supplied item data, validated when it enters a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub price: Decimal,
}

impl NewItem {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, quantity: i64, price: Decimal) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            quantity,
            price,
        }
    }
}

/// A validated, immutable line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    name: String,
    sku: String,
    quantity: u32,
    unit_price: Decimal,
    currency: Currency,
}

impl LineItem {
    /// Validate caller input and stamp it with the ledger's currency
    ///
    /// # Errors
    /// * `InvalidItem` - quantity is not positive, price is negative or finer
    ///   than the currency's minor unit, or the name is blank
    pub fn new(item: NewItem, currency: Currency) -> Result<Self> {
        Self::validate_name(&item.name)?;
        let quantity = Self::validate_quantity(item.quantity)?;
        Self::validate_unit_price(item.price, currency)?;

        if Decimal::from(quantity).checked_mul(item.price).is_none() {
            return Err(AppError::invalid_item(format!(
                "Subtotal for '{}' exceeds the representable range",
                item.name
            )));
        }

        Ok(Self {
            name: item.name,
            sku: item.sku,
            quantity,
            unit_price: item.price,
            currency,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// quantity × unit_price, unrounded
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AppError::invalid_item("Item name cannot be empty"));
        }

        Ok(())
    }

    fn validate_quantity(quantity: i64) -> Result<u32> {
        if quantity <= 0 {
            return Err(AppError::invalid_item(format!(
                "Quantity must be positive, got: {}",
                quantity
            )));
        }

        u32::try_from(quantity).map_err(|_| {
            AppError::invalid_item(format!("Quantity is too large, got: {}", quantity))
        })
    }

    fn validate_unit_price(unit_price: Decimal, currency: Currency) -> Result<()> {
        if unit_price < Decimal::ZERO {
            return Err(AppError::invalid_item(format!(
                "Unit price must be non-negative, got: {}",
                unit_price
            )));
        }

        // Item prices and the total are sent as separately formatted strings,
        // so a price PayPal would round makes them disagree
        if unit_price.normalize().scale() > currency.scale() {
            return Err(AppError::invalid_item(format!(
                "Unit price {} has more than {} decimal places allowed for {}",
                unit_price,
                currency.scale(),
                currency
            )));
        }

        Ok(())
    }
}
