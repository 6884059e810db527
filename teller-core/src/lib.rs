//! teller-core: transaction model, amount and date normalization, reconciliation

pub mod amount;
pub mod dates;
pub mod error;
pub mod reconcile;
pub mod transaction;

pub use amount::{Amount, parse_amount};
pub use dates::{Rollover, YearCursor, parse_month};
pub use error::FormatError;
pub use reconcile::{
    ReconciliationError, ReconciliationReport, ReconciliationSummary, reconcile,
};
pub use transaction::{
    AccountType, StatementShape, Transaction, TransactionSet, TransactionSetBuilder,
};
