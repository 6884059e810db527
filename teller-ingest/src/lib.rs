//! teller-ingest: statement layout regions, narrative/tabular parsers and the
//! per-statement extraction + reconciliation pipeline.

pub mod balance;
pub mod batch;
pub mod error;
pub mod layout;
pub mod parsers;
pub mod processor;
pub mod region;
pub mod table;

pub use batch::{BatchError, BatchReport, FailurePolicy, StatementLoader, run_batch};
pub use error::{BalanceKind, StatementError};
pub use layout::{BBox, DocumentLayout, LayoutDocument, LayoutPage, PageLayout, Word};
pub use parsers::ExtractedStatement;
pub use processor::{ProcessorOptions, StatementInfo, StatementOutcome, StatementProcessor};
pub use table::{TableExtractor, TableRow, TemplateTableExtractor};
