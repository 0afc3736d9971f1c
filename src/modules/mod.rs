pub mod billing;
pub mod cart;
pub mod checkout;
pub mod gateways;
