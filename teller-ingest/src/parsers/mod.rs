//! Statement-shape-specific extraction pipelines.

pub mod narrative;
pub mod tabular;

use teller_core::{Amount, TransactionSet};

/// Balances and transactions read from one statement, not yet reconciled.
#[derive(Debug, Clone)]
pub struct ExtractedStatement {
    pub opening: Amount,
    pub closing: Amount,
    pub transactions: TransactionSet,
}
