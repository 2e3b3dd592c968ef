pub mod error;
pub mod record;

pub use error::HookError;
pub use record::{Authorization, Transaction, TransactionSummary, SIMULATION_REFERENCE};
