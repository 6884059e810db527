//! Tabular (chequing/savings) statement parser.
//!
//! Rows come from a template-driven table extractor. Depending on the
//! template a row carries either separate `Date` / `Description` fields or a
//! single `Date Description` field:
//!
//!   Date Description            Withdrawals ($)   Deposits ($)
//!   15 JAN GROCERY STORE                  45.10
//!   MAIN ST BRANCH                                              (continuation)
//!   16 JAN PAYROLL ACME                                 1,200.00
//!
//! The first and last rows are the opening and closing balance lines.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use teller_core::{
    AccountType, Rollover, TransactionSet, TransactionSetBuilder, YearCursor, parse_amount,
};

use crate::balance::extract_balances;
use crate::error::StatementError;
use crate::layout::{LayoutDocument, LayoutPage};
use crate::parsers::ExtractedStatement;
use crate::table::{TableExtractor, TableRow};

pub const DATE_DESCRIPTION: &str = "Date Description";
pub const DATE: &str = "Date";
pub const DESCRIPTION: &str = "Description";
pub const WITHDRAWALS: &str = "Withdrawals ($)";
pub const DEPOSITS: &str = "Deposits ($)";

#[derive(Debug, Clone)]
pub struct TabularOptions {
    pub templates_dir: PathBuf,
    pub x_tolerance: f64,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("tabula_templates"),
            x_tolerance: crate::layout::DEFAULT_X_TOLERANCE,
        }
    }
}

/// Result of splitting a combined `Date Description` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSplit {
    /// `None` for a continuation line of an earlier row.
    pub date: Option<String>,
    pub description: String,
}

/// Split `15 JAN GROCERY STORE` into `15 JAN` and `GROCERY STORE`.
///
/// The field only carries a date when it has more than two tokens and the
/// first one is a day number in `0..=31`; anything else is all description.
pub fn split_date_description(field: &str) -> DateSplit {
    let tokens: Vec<&str> = field.split_whitespace().collect();
    let leads_with_day = tokens
        .first()
        .and_then(|t| t.parse::<i64>().ok())
        .is_some_and(|day| (0..=31).contains(&day));

    if tokens.len() > 2 && leads_with_day {
        DateSplit {
            date: Some(tokens[..2].join(" ")),
            description: tokens[2..].join(" "),
        }
    } else {
        DateSplit {
            date: None,
            description: field.to_string(),
        }
    }
}

/// Template file for a document with `page_count` pages.
pub fn template_path(templates_dir: &Path, page_count: usize) -> PathBuf {
    templates_dir.join(format!("{page_count}.json"))
}

fn cell<'r>(row: &'r TableRow, name: &str) -> Option<&'r str> {
    row.get(name)
        .and_then(|v| v.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Date field of a row: `None` when the row has no date column at all,
/// `Some(None)` when the date is blank and carries over from the row above.
fn date_and_description(row: &TableRow) -> (Option<Option<String>>, String) {
    if let Some(combined) = row.get(DATE_DESCRIPTION) {
        let split = split_date_description(combined.as_deref().unwrap_or_default());
        return (Some(split.date), split.description);
    }
    match row.get(DATE) {
        Some(date) => (
            Some(
                date.as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            ),
            cell(row, DESCRIPTION).unwrap_or_default().to_string(),
        ),
        None => (None, String::new()),
    }
}

/// Turn extracted table rows into a numbered transaction set.
///
/// `rows` is every row of every table, in order, balance rows included.
pub fn parse_table_rows(
    rows: &[TableRow],
    account: AccountType,
    start_year: i32,
) -> Result<TransactionSet, StatementError> {
    let body = match rows.len() {
        0..=2 => &rows[..0],
        n => &rows[1..n - 1],
    };

    let mut cursor = YearCursor::new(start_year, Rollover::Wrap);
    let mut last_date: Option<NaiveDate> = None;
    let mut builder = TransactionSetBuilder::new(account);

    for (index, row) in body.iter().enumerate() {
        let (date_field, description) = date_and_description(row);
        let Some(date_field) = date_field else {
            tracing::debug!(row = index + 1, "row has no date column, skipping");
            continue;
        };

        let date = match date_field {
            Some(token) => match cursor.resolve_day_month(&token) {
                Ok(d) => {
                    last_date = Some(d);
                    d
                }
                Err(e) => {
                    tracing::warn!(row = index + 1, error = %e, "skipping row with bad date");
                    continue;
                }
            },
            None => match last_date {
                Some(d) => d,
                None => {
                    tracing::warn!(
                        row = index + 1,
                        %description,
                        "continuation row before any dated row"
                    );
                    continue;
                }
            },
        };

        let amount = if let Some(withdrawal) = cell(row, WITHDRAWALS) {
            -parse_amount(withdrawal)?
        } else if let Some(deposit) = cell(row, DEPOSITS) {
            parse_amount(deposit)?
        } else {
            continue;
        };

        builder.push(date, description, amount);
    }

    Ok(builder.finish())
}

/// Read balances from the full text, pull rows through the page-count
/// template and parse them.
pub fn extract_tabular<D, T>(
    document: &D,
    tables: &T,
    account: AccountType,
    start_year: i32,
    options: &TabularOptions,
) -> Result<ExtractedStatement, StatementError>
where
    D: LayoutDocument,
    T: TableExtractor + ?Sized,
{
    let text = document
        .pages()
        .iter()
        .map(|p| p.text(options.x_tolerance))
        .collect::<Vec<_>>()
        .join("\n");
    let balances = extract_balances(&text, account)?;

    let template = template_path(&options.templates_dir, document.page_count());
    tracing::debug!(template = %template.display(), "extracting tables");
    let rows: Vec<TableRow> = tables
        .extract_tables(&template)?
        .into_iter()
        .flatten()
        .collect();

    let transactions = parse_table_rows(&rows, account, start_year)?;
    Ok(ExtractedStatement {
        opening: balances.opening,
        closing: balances.closing,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use teller_core::Amount;

    fn row(fields: &[(&str, Option<&str>)]) -> TableRow {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(String::from)))
            .collect()
    }

    fn combined(text: Option<&str>, out: Option<&str>, inn: Option<&str>) -> TableRow {
        row(&[(DATE_DESCRIPTION, text), (WITHDRAWALS, out), (DEPOSITS, inn)])
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_split_with_leading_day() {
        assert_eq!(
            split_date_description("15 JAN GROCERY STORE"),
            DateSplit {
                date: Some("15 JAN".into()),
                description: "GROCERY STORE".into()
            }
        );
    }

    #[test]
    fn test_split_without_day_is_all_description() {
        assert_eq!(
            split_date_description("GROCERY STORE CONT'D"),
            DateSplit {
                date: None,
                description: "GROCERY STORE CONT'D".into()
            }
        );
        // two tokens only, or day out of range
        assert_eq!(split_date_description("15 JAN").date, None);
        assert_eq!(split_date_description("45 MAIN STREET").date, None);
    }

    #[test]
    fn test_rows_between_balance_lines_become_transactions() {
        let rows = vec![
            combined(Some("01 JAN Opening balance"), None, None),
            combined(Some("15 JAN GROCERY STORE"), Some("45.10"), None),
            combined(Some("MAIN ST BRANCH"), None, Some("3.00")),
            combined(Some("16 JAN PAYROLL ACME"), None, Some("1,200.00")),
            combined(Some("Interest summary"), None, None),
            combined(Some("31 JAN Closing balance"), None, None),
        ];
        let txns: Vec<_> = parse_table_rows(&rows, AccountType::Chequing, 2023)
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].date(), ymd(2023, 1, 15));
        assert_eq!(txns[0].amount(), Amount::new(-4_510, 2));
        assert_eq!(txns[1].date(), ymd(2023, 1, 15));
        assert_eq!(txns[1].description(), "MAIN ST BRANCH");
        assert_eq!(txns[2].amount(), Amount::new(120_000, 2));
        assert!(txns.iter().all(|t| t.account_type() == AccountType::Chequing));
    }

    #[test]
    fn test_separate_date_column_and_year_wrap() {
        let sep = |date: Option<&str>, desc: &str, out: Option<&str>| {
            row(&[
                (DATE, date),
                (DESCRIPTION, Some(desc)),
                (WITHDRAWALS, out),
                (DEPOSITS, None),
            ])
        };
        let rows = vec![
            sep(Some("01 DEC"), "Opening", None),
            sep(Some("30 DEC"), "RENT", Some("900.00")),
            sep(None, "RENT FEE", Some("5.00")),
            sep(Some("02 JAN"), "GYM", Some("40.00")),
            sep(Some("31 JAN"), "Closing", None),
        ];
        let txns: Vec<_> = parse_table_rows(&rows, AccountType::Savings, 2022)
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].date(), ymd(2022, 12, 30));
        assert_eq!(txns[1].date(), ymd(2022, 12, 30));
        assert_eq!(txns[1].description(), "RENT FEE");
        assert_eq!(txns[2].date(), ymd(2023, 1, 2));
    }

    #[test]
    fn test_rows_without_date_column_are_skipped() {
        let rows = vec![
            row(&[]),
            row(&[(DESCRIPTION, Some("Summary")), (WITHDRAWALS, Some("1.00"))]),
            row(&[]),
        ];
        assert!(parse_table_rows(&rows, AccountType::Chequing, 2023).unwrap().is_empty());
    }

    #[test]
    fn test_too_few_rows_yield_nothing() {
        let rows = vec![combined(Some("15 JAN SHOP"), Some("1.00"), None)];
        assert!(parse_table_rows(&rows, AccountType::Chequing, 2023).unwrap().is_empty());
    }

    #[test]
    fn test_bad_amount_cell_aborts() {
        let rows = vec![
            combined(None, None, None),
            combined(Some("15 JAN SHOP"), Some("12.3.4"), None),
            combined(None, None, None),
        ];
        assert!(matches!(
            parse_table_rows(&rows, AccountType::Chequing, 2023),
            Err(StatementError::Format(_))
        ));
    }

    #[test]
    fn test_template_path_uses_page_count() {
        assert_eq!(
            template_path(Path::new("tabula_templates"), 3),
            PathBuf::from("tabula_templates/3.json")
        );
    }

    #[test]
    fn test_impossible_date_row_does_not_move_the_year() {
        let rows = vec![
            combined(Some("01 NOV Opening balance"), None, None),
            combined(Some("30 NOV ITEM"), Some("1.00"), None),
            combined(Some("31 FEB ITEM"), None, None),
            combined(Some("01 DEC ITEM"), Some("1.00"), None),
            combined(Some("31 DEC Closing balance"), None, None),
        ];
        let dates: Vec<_> = parse_table_rows(&rows, AccountType::Chequing, 2022)
            .unwrap()
            .iter()
            .map(|t| t.date())
            .collect();
        assert_eq!(dates, vec![ymd(2022, 11, 30), ymd(2022, 12, 1)]);
    }
}
