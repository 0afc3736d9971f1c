pub mod checkout;

pub use checkout::{
    CallbackOutcome, CallbackParams, CheckoutCreated, CheckoutId, CheckoutState,
    CreateCheckoutRequest, PendingPayment, PENDING_PAYMENT_KEY,
};
