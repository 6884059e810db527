//! Narrative (credit-card) statement parser.
//!
//! Expected text in the transaction region after cropping:
//!   JAN 05 JAN 06 COFFEE SHOP $50.00
//!   JAN 09 JAN 10 PAYMENT - THANK YOU -$250.00
//!
//! The first `MMM DD` is the transaction date, the second the posting date.
//! Charges are printed positive and become outflows.

use regex::Regex;
use teller_core::{
    AccountType, Rollover, TransactionSet, TransactionSetBuilder, YearCursor, parse_amount,
};

use crate::balance::extract_balances;
use crate::error::StatementError;
use crate::layout::{LayoutDocument, LayoutPage};
use crate::parsers::ExtractedStatement;
use crate::region::{balance_region, transaction_region};

const TRANSACTION_PATTERN: &str = concat!(
    r"(?m)^(?P<dates>(?:\w{3} \d{2} ){2})",
    r"(?P<description>.+)\s",
    r"(?P<amount>-?\$[\d,]+\.\d{2})"
);

#[derive(Debug, Clone, Copy)]
pub struct NarrativeOptions {
    pub x_tolerance: f64,
    pub rollover: Rollover,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            x_tolerance: crate::layout::DEFAULT_X_TOLERANCE,
            rollover: Rollover::default(),
        }
    }
}

/// One matched transaction line, still as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeLine<'t> {
    pub transaction_date: String,
    /// Matched but not used downstream.
    pub posting_date: String,
    pub description: &'t str,
    pub amount: &'t str,
}

/// All transaction lines in `text`, in printed order.
pub fn match_lines(text: &str) -> Result<Vec<NarrativeLine<'_>>, StatementError> {
    let re = Regex::new(TRANSACTION_PATTERN)?;
    let lines = re
        .captures_iter(text)
        .map(|caps| {
            let tokens: Vec<&str> = caps
                .name("dates")
                .map_or("", |m| m.as_str())
                .split_whitespace()
                .collect();
            NarrativeLine {
                transaction_date: tokens.get(0..2).unwrap_or_default().join(" "),
                posting_date: tokens.get(2..4).unwrap_or_default().join(" "),
                description: caps.name("description").map_or("", |m| m.as_str().trim()),
                amount: caps.name("amount").map_or("", |m| m.as_str()),
            }
        })
        .collect();
    Ok(lines)
}

/// Turn cropped transaction text into a numbered transaction set.
///
/// `start_year` seeds the year cursor; lines whose date cannot be resolved
/// are skipped with a warning.
pub fn parse_narrative_text(
    text: &str,
    start_year: i32,
    rollover: Rollover,
) -> Result<TransactionSet, StatementError> {
    let mut cursor = YearCursor::new(start_year, rollover);
    let mut builder = TransactionSetBuilder::new(AccountType::Visa);

    for line in match_lines(text)? {
        let date = match cursor.resolve_month_day(&line.transaction_date) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(line = ?line, error = %e, "skipping transaction line");
                continue;
            }
        };
        let amount = -parse_amount(line.amount)?;
        builder.push(date, line.description, amount);
    }

    Ok(builder.finish())
}

/// Region-crop every page, read balances from the first page and parse the
/// transaction lines.
pub fn extract_narrative<D: LayoutDocument>(
    document: &D,
    start_year: i32,
    options: &NarrativeOptions,
) -> Result<ExtractedStatement, StatementError> {
    let first = document.pages().first().ok_or(StatementError::EmptyDocument)?;
    let transaction_box = transaction_region(first);
    let balance_box = balance_region(first);
    tracing::debug!(?transaction_box, ?balance_box, "narrative regions");

    let balance_text = first.crop_text(balance_box, options.x_tolerance);
    let balances = extract_balances(&balance_text, AccountType::Visa)?;

    let mut text = String::new();
    for page in document.pages() {
        text.push('\n');
        text.push_str(&page.crop_text(transaction_box, options.x_tolerance));
    }

    let transactions = parse_narrative_text(&text, start_year, options.rollover)?;
    Ok(ExtractedStatement {
        opening: balances.opening,
        closing: balances.closing,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use teller_core::Amount;

    #[test]
    fn test_match_lines_keeps_both_dates() {
        let text = "JAN 05 JAN 06 COFFEE SHOP $50.00\nnot a transaction\n";
        let lines = match_lines(text).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].transaction_date, "JAN 05");
        assert_eq!(lines[0].posting_date, "JAN 06");
        assert_eq!(lines[0].description, "COFFEE SHOP");
        assert_eq!(lines[0].amount, "$50.00");
    }

    #[test]
    fn test_charges_become_outflows_and_credits_inflows() {
        let text = "\nJAN 05 JAN 06 COFFEE SHOP $1,050.00\n\
                    JAN 09 JAN 10 PAYMENT - THANK YOU -$250.00\n";
        let txns: Vec<_> = parse_narrative_text(text, 2023, Rollover::default())
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].amount(), Amount::new(-105_000, 2));
        assert_eq!(txns[1].amount(), Amount::new(25_000, 2));
        assert_eq!(txns[1].description(), "PAYMENT - THANK YOU");
    }

    #[test]
    fn test_year_rolls_over_in_printed_order() {
        let text = "DEC 28 DEC 29 HOTEL $100.00\n\
                    JAN 02 JAN 03 TAXI $20.00\n\
                    DEC 31 JAN 04 LATE POST $5.00\n";
        let txns = parse_narrative_text(text, 2022, Rollover::default()).unwrap();
        let mut by_desc: Vec<_> = txns.iter().map(|t| (t.description(), t.date())).collect();
        by_desc.sort();
        assert_eq!(
            by_desc,
            vec![
                ("HOTEL", NaiveDate::from_ymd_opt(2022, 12, 28).unwrap()),
                ("LATE POST", NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()),
                ("TAXI", NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()),
            ]
        );
    }

    #[test]
    fn test_unresolvable_date_is_skipped() {
        let text = "FEB 30 MAR 01 BAD DAY $1.00\nMAR 02 MAR 03 OK $2.00\n";
        let txns = parse_narrative_text(text, 2023, Rollover::default()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns.iter().next().unwrap().description(), "OK");
    }

    #[test]
    fn test_repeated_lines_are_kept() {
        let text = "MAR 02 MAR 03 TRANSIT $2.75\nMAR 02 MAR 03 TRANSIT $2.75\n";
        let txns = parse_narrative_text(text, 2023, Rollover::default()).unwrap();
        assert_eq!(txns.len(), 2);
    }

    #[test]
    fn test_skipped_date_does_not_shift_later_years() {
        let text = "JAN 05 JAN 06 FIRST $1.00\n\
                    DEC 32 JAN 07 BROKEN $1.00\n\
                    FEB 01 FEB 02 LATER $1.00\n";
        let txns = parse_narrative_text(text, 2023, Rollover::default()).unwrap();
        let dates: Vec<_> = txns.iter().map(|t| t.date()).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            ]
        );
    }
}
