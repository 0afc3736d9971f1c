pub mod coordinator;
pub mod expiry_sweeper;
pub mod session_store;

pub use coordinator::PaymentSessionCoordinator;
pub use expiry_sweeper::ExpirySweeper;
pub use session_store::{InMemorySessionStore, SessionStore};
