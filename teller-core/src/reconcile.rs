//! Balance reconciliation gate for a single statement.

use std::fmt;
use thiserror::Error;

use crate::amount::Amount;
use crate::transaction::{Transaction, TransactionSet};

/// Totals computed over one statement's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub opening: Amount,
    pub closing: Amount,
    pub net: Amount,
    pub inflow: Amount,
    pub outflow: Amount,
}

impl ReconciliationSummary {
    pub fn compute(opening: Amount, closing: Amount, transactions: &TransactionSet) -> Self {
        let amounts = || transactions.iter().map(Transaction::amount);
        Self {
            opening,
            closing,
            net: amounts().sum(),
            inflow: amounts().filter(|a| *a > Amount::ZERO).sum(),
            outflow: amounts().filter(|a| *a < Amount::ZERO).sum(),
        }
    }

    /// Balance movement reported by the statement.
    pub fn expected(&self) -> Amount {
        self.closing - self.opening
    }

    pub fn is_balanced(&self) -> bool {
        self.expected() == self.net
    }
}

/// Everything needed to chase down a bad parse by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub summary: ReconciliationSummary,
    /// Sorted by date, then document order.
    pub transactions: Vec<Transaction>,
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Opening reported at {:.2}", s.opening)?;
        writeln!(f, "Closing reported at {:.2}", s.closing)?;
        writeln!(f, "Expected movement (closing - opening): {:.2}", s.expected())?;
        writeln!(
            f,
            "Transactions (net/in/out): {:.2} / {:.2} / {:.2}",
            s.net, s.inflow, s.outflow
        )?;
        writeln!(f, "Parsed transactions ({}):", self.transactions.len())?;
        for t in &self.transactions {
            writeln!(f, "  {t}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("transactions do not reconcile with statement balances\n{report}")]
pub struct ReconciliationError {
    pub report: Box<ReconciliationReport>,
}

/// Check that the transactions account for the whole balance movement.
///
/// A mismatch is never partially accepted: the full report is logged and
/// returned inside the error.
pub fn reconcile(
    opening: Amount,
    closing: Amount,
    transactions: &TransactionSet,
) -> Result<ReconciliationSummary, ReconciliationError> {
    let summary = ReconciliationSummary::compute(opening, closing, transactions);
    if summary.is_balanced() {
        return Ok(summary);
    }

    let report = ReconciliationReport {
        summary,
        transactions: transactions.iter().cloned().collect(),
    };
    tracing::error!(
        opening = %summary.opening,
        closing = %summary.closing,
        net = %summary.net,
        "discrepancy found, bad parse\n{report}"
    );
    Err(ReconciliationError {
        report: Box::new(report),
    })
}
