pub mod item_ledger;

pub use item_ledger::ItemLedger;
