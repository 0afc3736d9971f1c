pub mod models;
pub mod services;

pub use models::{LineItem, NewItem};
pub use services::ItemLedger;
