//! Record-level parse errors.

use thiserror::Error;

/// A currency or date token does not match its expected lexical shape.
///
/// These are local to the record being parsed; extractors decide whether a
/// record is skipped or the statement aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid amount '{0}'")]
    Amount(String),
    #[error("invalid month '{0}'")]
    Month(String),
    #[error("invalid day '{0}'")]
    Day(String),
    #[error("invalid date '{0}'")]
    Date(String),
}
