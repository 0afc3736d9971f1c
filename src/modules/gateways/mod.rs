pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{CreatedIntent, PaymentDetails, PaymentHistory, PaymentIntentRequest};
pub use services::{BillingGateway, PaymentGateway, PaypalClient};
