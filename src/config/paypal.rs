use crate::core::{AppError, Currency, Result};
use std::time::Duration;

use super::{parse_or, Lookup};

const SANDBOX_BASE_URL: &str = "https://api.sandbox.paypal.com";
const LIVE_BASE_URL: &str = "https://api.paypal.com";

/// PayPal operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaypalMode {
    Sandbox,
    Live,
}

impl std::str::FromStr for PaypalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(PaypalMode::Sandbox),
            "live" => Ok(PaypalMode::Live),
            _ => Err(format!("Invalid PayPal mode: {}", s)),
        }
    }
}

impl std::fmt::Display for PaypalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaypalMode::Sandbox => write!(f, "sandbox"),
            PaypalMode::Live => write!(f, "live"),
        }
    }
}

/// Credentials and transport settings for the PayPal REST API
#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub currency: Currency,
    pub mode: PaypalMode,
    /// Overrides the mode's API host (e.g. a local test double)
    pub base_url_override: Option<String>,
    pub connection_timeout_ms: u64,
}

impl PaypalConfig {
    pub(super) fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        Ok(PaypalConfig {
            client_id: lookup("PAYPAL_CLIENT_ID")
                .ok_or_else(|| AppError::configuration("PAYPAL_CLIENT_ID not set"))?,
            client_secret: lookup("PAYPAL_SECRET")
                .ok_or_else(|| AppError::configuration("PAYPAL_SECRET not set"))?,
            currency: parse_or(lookup, "PAYPAL_CURRENCY", Currency::USD)?,
            mode: parse_or(lookup, "PAYPAL_MODE", PaypalMode::Sandbox)?,
            base_url_override: lookup("PAYPAL_BASE_URL").filter(|url| !url.trim().is_empty()),
            connection_timeout_ms: parse_or(lookup, "PAYPAL_CONNECTION_TIMEOUT_MS", 3000)?,
        })
    }

    pub fn base_url(&self) -> String {
        match &self.base_url_override {
            Some(url) => url.clone(),
            None => match self.mode {
                PaypalMode::Sandbox => SANDBOX_BASE_URL.to_string(),
                PaypalMode::Live => LIVE_BASE_URL.to_string(),
            },
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "PayPal client id and secret must not be empty",
            ));
        }

        if self.connection_timeout_ms == 0 {
            return Err(AppError::configuration(
                "PayPal connection timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}
