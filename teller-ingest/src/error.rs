use std::fmt;
use std::path::PathBuf;
use teller_core::{AccountType, FormatError, ReconciliationError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceKind {
    Opening,
    Closing,
}

impl fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceKind::Opening => f.write_str("opening"),
            BalanceKind::Closing => f.write_str("closing"),
        }
    }
}

/// Failure that stops one statement from being accepted.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("{which} balance not found in {account} statement text")]
    BalanceNotFound {
        which: BalanceKind,
        account: AccountType,
    },

    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    #[error("{} is not under a visa/, chequing/ or savings/ directory", .0.display())]
    UnknownAccountDirectory(PathBuf),

    #[error("no -YYYY start year in statement file name '{0}'")]
    MissingStartYear(String),

    #[error("statement document has no pages")]
    EmptyDocument,

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Layout or table extraction failed outside this crate.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}
