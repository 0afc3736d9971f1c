pub mod gateway_trait;
pub mod paypal;
pub mod paypal_auth;
pub mod paypal_billing;

pub use gateway_trait::{BillingGateway, PaymentGateway};
pub use paypal::PaypalClient;
pub use paypal_auth::PaypalAuth;
