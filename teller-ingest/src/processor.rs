//! Per-statement orchestration: pick the pipeline for the account, extract,
//! reconcile.

use regex::Regex;
use std::path::{Path, PathBuf};
use teller_core::{
    AccountType, ReconciliationSummary, Rollover, StatementShape, TransactionSet, reconcile,
};

use crate::error::StatementError;
use crate::layout::{DEFAULT_X_TOLERANCE, LayoutDocument};
use crate::parsers::narrative::{NarrativeOptions, extract_narrative};
use crate::parsers::tabular::{TabularOptions, extract_tabular};
use crate::table::TableExtractor;

/// Where a statement came from and what its path says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementInfo {
    pub path: PathBuf,
    pub account_type: AccountType,
    /// Year of the first transaction, from the `-YYYY` in the file name.
    pub start_year: i32,
}

impl StatementInfo {
    /// `.../visa/statement-2023-01.pdf` -> Visa, 2023.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StatementError> {
        let path = path.as_ref();
        let account_type = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .and_then(AccountType::from_dir_name)
            .ok_or_else(|| StatementError::UnknownAccountDirectory(path.to_path_buf()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let start_year = start_year(&file_name)?
            .ok_or_else(|| StatementError::MissingStartYear(file_name.clone()))?;

        Ok(Self {
            path: path.to_path_buf(),
            account_type,
            start_year,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// First four-digit year preceded by a hyphen in a file name.
pub fn start_year(file_name: &str) -> Result<Option<i32>, StatementError> {
    let re = Regex::new(r"-(\d{4})")?;
    Ok(re
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok()))
}

#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    pub templates_dir: PathBuf,
    pub x_tolerance: f64,
    pub narrative_rollover: Rollover,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("tabula_templates"),
            x_tolerance: DEFAULT_X_TOLERANCE,
            narrative_rollover: Rollover::default(),
        }
    }
}

/// An accepted statement.
#[derive(Debug, Clone)]
pub struct StatementOutcome {
    pub info: StatementInfo,
    pub summary: ReconciliationSummary,
    pub transactions: TransactionSet,
}

#[derive(Debug, Clone, Default)]
pub struct StatementProcessor {
    options: ProcessorOptions,
}

impl StatementProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }

    /// Extract and reconcile one statement. `tables` is only consulted for
    /// tabular accounts.
    pub fn process<D, T>(
        &self,
        info: &StatementInfo,
        document: &D,
        tables: &T,
    ) -> Result<StatementOutcome, StatementError>
    where
        D: LayoutDocument,
        T: TableExtractor + ?Sized,
    {
        let span = tracing::info_span!(
            "statement",
            file = %info.file_name(),
            account = %info.account_type
        );
        let _guard = span.enter();

        if document.page_count() == 0 {
            return Err(StatementError::EmptyDocument);
        }

        let extracted = match info.account_type.shape() {
            StatementShape::Narrative => extract_narrative(
                document,
                info.start_year,
                &NarrativeOptions {
                    x_tolerance: self.options.x_tolerance,
                    rollover: self.options.narrative_rollover,
                },
            )?,
            StatementShape::Tabular => extract_tabular(
                document,
                tables,
                info.account_type,
                info.start_year,
                &TabularOptions {
                    templates_dir: self.options.templates_dir.clone(),
                    x_tolerance: self.options.x_tolerance,
                },
            )?,
        };

        let summary = reconcile(extracted.opening, extracted.closing, &extracted.transactions)?;
        tracing::info!(
            transactions = extracted.transactions.len(),
            opening = %summary.opening,
            closing = %summary.closing,
            net = %summary.net,
            "statement reconciled"
        );

        Ok(StatementOutcome {
            info: info.clone(),
            summary,
            transactions: extracted.transactions,
        })
    }
}
