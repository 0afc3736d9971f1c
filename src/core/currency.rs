use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currencies accepted by the PayPal REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    AUD,
    BRL,
    CAD,
    CHF,
    CNY,
    CZK,
    DKK,
    EUR,
    GBP,
    HKD,
    /// Hungarian Forint (no decimal places)
    HUF,
    ILS,
    /// Japanese Yen (no decimal places)
    JPY,
    MXN,
    MYR,
    NOK,
    NZD,
    PHP,
    PLN,
    RUB,
    SEK,
    SGD,
    THB,
    /// New Taiwan Dollar (no decimal places)
    TWD,
    #[default]
    USD,
}

impl Currency {
    pub const ALL: [Currency; 25] = [
        Currency::AUD,
        Currency::BRL,
        Currency::CAD,
        Currency::CHF,
        Currency::CNY,
        Currency::CZK,
        Currency::DKK,
        Currency::EUR,
        Currency::GBP,
        Currency::HKD,
        Currency::HUF,
        Currency::ILS,
        Currency::JPY,
        Currency::MXN,
        Currency::MYR,
        Currency::NOK,
        Currency::NZD,
        Currency::PHP,
        Currency::PLN,
        Currency::RUB,
        Currency::SEK,
        Currency::SGD,
        Currency::THB,
        Currency::TWD,
        Currency::USD,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::BRL => "BRL",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::CZK => "CZK",
            Currency::DKK => "DKK",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::HKD => "HKD",
            Currency::HUF => "HUF",
            Currency::ILS => "ILS",
            Currency::JPY => "JPY",
            Currency::MXN => "MXN",
            Currency::MYR => "MYR",
            Currency::NOK => "NOK",
            Currency::NZD => "NZD",
            Currency::PHP => "PHP",
            Currency::PLN => "PLN",
            Currency::RUB => "RUB",
            Currency::SEK => "SEK",
            Currency::SGD => "SGD",
            Currency::THB => "THB",
            Currency::TWD => "TWD",
            Currency::USD => "USD",
        }
    }

    /// Returns the decimal scale PayPal accepts for this currency
    /// - HUF/JPY/TWD: 0
    /// - everything else: 2
    pub fn scale(&self) -> u32 {
        match self {
            Currency::HUF | Currency::JPY | Currency::TWD => 0,
            _ => 2,
        }
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }

    /// Formats an amount the way PayPal expects it on the wire ("24.98", "1500")
    pub fn format_wire(&self, amount: Decimal) -> String {
        let scale = self.scale() as usize;
        format!("{:.width$}", self.round(amount), width = scale)
    }

    /// Formats an amount for display with the correct decimal places
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{} {}", self, self.format_wire(amount))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| format!("Invalid currency: {}", s))
    }
}

impl TryFrom<String> for Currency {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}
