//! Sequential multi-statement runs and the aggregate transaction set.

use std::path::{Path, PathBuf};
use teller_core::{AccountType, ReconciliationSummary, TransactionSet};
use thiserror::Error;

use crate::error::StatementError;
use crate::layout::LayoutDocument;
use crate::processor::{StatementInfo, StatementProcessor};
use crate::table::TableExtractor;

/// What a run does when one statement fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole run at the first failed statement.
    #[default]
    Abort,
    /// Record the failure and move on to the next statement.
    Continue,
}

/// Opens the layout (and table source) for a statement file.
pub trait StatementLoader {
    type Document: LayoutDocument + TableExtractor;

    fn load(&self, info: &StatementInfo) -> anyhow::Result<Self::Document>;
}

#[derive(Debug, Clone)]
pub struct AcceptedStatement {
    pub path: PathBuf,
    pub account_type: AccountType,
    pub transactions: usize,
    pub summary: ReconciliationSummary,
}

#[derive(Debug, Clone)]
pub struct FailedStatement {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Union of every accepted statement's transactions.
    pub transactions: TransactionSet,
    pub accepted: Vec<AcceptedStatement>,
    pub failures: Vec<FailedStatement>,
}

#[derive(Debug, Error)]
#[error("failed to process {}", path.display())]
pub struct BatchError {
    pub path: PathBuf,
    #[source]
    pub source: StatementError,
}

fn process_one<L: StatementLoader>(
    path: &Path,
    loader: &L,
    processor: &StatementProcessor,
) -> Result<crate::processor::StatementOutcome, StatementError> {
    let info = StatementInfo::from_path(path)?;
    let document = loader.load(&info)?;
    processor.process(&info, &document, &document)
}

/// Process `paths` one after another and union the accepted sets.
pub fn run_batch<L: StatementLoader>(
    paths: &[PathBuf],
    loader: &L,
    processor: &StatementProcessor,
    policy: FailurePolicy,
) -> Result<BatchReport, BatchError> {
    let mut report = BatchReport::default();

    for path in paths {
        match process_one(path, loader, processor) {
            Ok(outcome) => {
                report.accepted.push(AcceptedStatement {
                    path: path.clone(),
                    account_type: outcome.info.account_type,
                    transactions: outcome.transactions.len(),
                    summary: outcome.summary,
                });
                report.transactions.extend(outcome.transactions);
            }
            Err(source) => match policy {
                FailurePolicy::Abort => {
                    return Err(BatchError {
                        path: path.clone(),
                        source,
                    });
                }
                FailurePolicy::Continue => {
                    tracing::error!(
                        path = %path.display(),
                        error = %source,
                        "statement rejected, continuing"
                    );
                    report.failures.push(FailedStatement {
                        path: path.clone(),
                        error: source.to_string(),
                    });
                }
            },
        }
    }

    tracing::info!(
        accepted = report.accepted.len(),
        failed = report.failures.len(),
        transactions = report.transactions.len(),
        "batch finished"
    );
    Ok(report)
}
