use crate::core::{AppError, Result};
use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

pub mod logging;
pub mod paypal;
pub mod server;

pub use logging::{init_tracing, LogConfig, LogLevel};
pub use paypal::{PaypalConfig, PaypalMode};
pub use server::ServerConfig;

/// Variable lookup used to build configuration (process env in production)
pub(crate) type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Parse `key` if set and non-empty, otherwise use `default`
pub(crate) fn parse_or<T: FromStr>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T> {
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid {}", key))),
        None => Ok(default),
    }
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub paypal: PaypalConfig,
    pub logging: LogConfig,
    pub plans: PlanCatalog,
    pub session: SessionConfig,
    pub server: ServerConfig,
}

/// Checkout session settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Minutes a pending payment stays redeemable; 0 disables expiry
    pub token_ttl_minutes: u64,
    /// Cookie signing key for the session middleware (at least 64 bytes)
    pub cookie_key: Option<String>,
}

impl SessionConfig {
    /// Pending payment lifetime, `None` when expiry is disabled
    ///
    /// # Errors
    /// * `Configuration` - the minutes do not fit a `chrono::Duration`
    pub fn token_ttl(&self) -> Result<Option<chrono::Duration>> {
        if self.token_ttl_minutes == 0 {
            return Ok(None);
        }

        i64::try_from(self.token_ttl_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .map(Some)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "CHECKOUT_TOKEN_TTL_MINUTES is out of range: {}",
                    self.token_ttl_minutes
                ))
            })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: 60,
            cookie_key: None,
        }
    }
}

/// Named billing plan identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCatalog {
    plans: BTreeMap<String, String>,
}

impl PlanCatalog {
    /// Environment variable backing each catalog name
    const ENTRIES: [(&'static str, &'static str); 4] = [
        ("standard", "PAYPAL_STANDARD_PLAN"),
        ("sliver", "PAYPAL_STANDARD_SILVER"),
        ("gold", "PAYPAL_STANDARD_GOLD"),
        ("platinum", "PAYPAL_STANDARD_PLATINUM"),
    ];

    fn from_lookup(lookup: Lookup<'_>) -> Self {
        let plans = Self::ENTRIES
            .iter()
            .filter_map(|(name, key)| {
                lookup(key)
                    .filter(|id| !id.trim().is_empty())
                    .map(|id| (name.to_string(), id))
            })
            .collect();

        Self { plans }
    }

    pub fn insert(&mut self, name: impl Into<String>, plan_id: impl Into<String>) {
        self.plans.insert(name.into().to_lowercase(), plan_id.into());
    }

    /// Plan id for a catalog name; "silver" is accepted for "sliver"
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        let key = if name == "silver" { "sliver" } else { name.as_str() };
        self.plans.get(key).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let config = Config {
            paypal: PaypalConfig::from_lookup(lookup)?,
            logging: LogConfig::from_lookup(lookup)?,
            plans: PlanCatalog::from_lookup(lookup),
            session: SessionConfig {
                token_ttl_minutes: parse_or(lookup, "CHECKOUT_TOKEN_TTL_MINUTES", 60)?,
                cookie_key: lookup("SESSION_KEY").filter(|key| !key.is_empty()),
            },
            server: ServerConfig::from_lookup(lookup)?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.paypal.validate()?;
        self.session.token_ttl()?;

        if let Some(key) = &self.session.cookie_key {
            if key.len() < 64 {
                return Err(AppError::configuration(
                    "SESSION_KEY must be at least 64 bytes",
                ));
            }
        }

        Ok(())
    }
}
