use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::Currency;

/// An exact decimal amount in a given currency.
///
/// Serializes as PayPal's currency object: `{"currency": "USD", "value": "24.98"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    pub currency: Currency,
    pub value: Decimal,
}

impl Money {
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { currency, value }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Amount string in PayPal wire format
    pub fn wire_value(&self) -> String {
        self.currency.format_wire(self.value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.currency.format_amount(self.value))
    }
}

#[derive(Serialize, Deserialize)]
struct WireMoney {
    currency: String,
    value: String,
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireMoney {
            currency: self.currency.code().to_string(),
            value: self.wire_value(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireMoney::deserialize(deserializer)?;
        let currency = Currency::from_str(&wire.currency).map_err(serde::de::Error::custom)?;
        let value = Decimal::from_str(&wire.value).map_err(serde::de::Error::custom)?;
        Ok(Money { currency, value })
    }
}
