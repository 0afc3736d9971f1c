//! PayPal checkout library
//!
//! Cart aggregation and the two-phase PayPal redirect flow (create, buyer
//! approval, capture) on top of PayPal's classic `/v1/payments` REST API,
//! plus pass-through access to billing plans and agreements.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use paypal_checkout::{config::Config, gateways::PaypalClient};
//! # use paypal_checkout::checkout::{CheckoutId, InMemorySessionStore, PaymentSessionCoordinator};
//! # use paypal_checkout::cart::NewItem;
//! # async fn run() -> paypal_checkout::core::Result<()> {
//! let config = Config::from_env()?;
//! let gateway = Arc::new(PaypalClient::new(&config.paypal)?);
//!
//! let mut checkout =
//!     PaymentSessionCoordinator::new(gateway, InMemorySessionStore::new(), CheckoutId::new());
//! checkout.add_item(NewItem::new("Widget", "W1", 2, "9.99".parse().unwrap()))?;
//! checkout.set_return_url("https://shop.example/paypal/return");
//!
//! let created = checkout.create_payment("Order #1001").await?;
//! println!("send the buyer to {}", created.approval_url);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::billing;
pub use modules::cart;
pub use modules::checkout;
pub use modules::gateways;
