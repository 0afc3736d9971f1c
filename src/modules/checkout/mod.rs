// Checkout module: two-phase PayPal redirect flow

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::{configure, CheckoutSettings};
pub use models::{
    CallbackOutcome, CallbackParams, CheckoutCreated, CheckoutId, CheckoutState,
    CreateCheckoutRequest, PendingPayment,
};
pub use services::{ExpirySweeper, InMemorySessionStore, PaymentSessionCoordinator, SessionStore};
