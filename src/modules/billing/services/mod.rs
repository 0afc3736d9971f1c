pub mod billing_service;

pub use billing_service::{
    transaction_window, BillingService, DEFAULT_CANCEL_NOTE, DEFAULT_REACTIVATE_NOTE,
    DEFAULT_SUSPEND_NOTE,
};
