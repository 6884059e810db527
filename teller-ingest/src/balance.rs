//! Opening/closing balance extraction from statement text.

use regex::Regex;
use teller_core::{AccountType, Amount, parse_amount};

use crate::error::{BalanceKind, StatementError};

const BALANCE_AMOUNT: &str = r"(?P<balance>-?\$[\d,]+\.\d{2})";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    pub opening: Amount,
    pub closing: Amount,
}

/// Pattern around the amount: the label before it and what may follow it.
/// Deposit accounts take the last amount on the label's line.
fn label(account: AccountType, which: BalanceKind) -> (&'static str, &'static str) {
    match (account, which) {
        (AccountType::Visa, BalanceKind::Opening) => (r"Previous Account Balance ", ""),
        (AccountType::Visa, BalanceKind::Closing) => (r"Total Account Balance ", ""),
        (_, BalanceKind::Opening) => (r"(?m)Your opening balance[^\n]*?", r"[^$\n]*$"),
        (_, BalanceKind::Closing) => (r"(?m)Your closing balance[^\n]*?", r"[^$\n]*$"),
    }
}

/// Find one balance figure, failing if the label is not in `text`.
pub fn find_balance(
    text: &str,
    account: AccountType,
    which: BalanceKind,
) -> Result<Amount, StatementError> {
    let (before, after) = label(account, which);
    let re = Regex::new(&format!("{before}{BALANCE_AMOUNT}{after}"))?;
    let caps = re
        .captures(text)
        .ok_or(StatementError::BalanceNotFound { which, account })?;
    Ok(parse_amount(&caps["balance"])?)
}

pub fn opening_balance(text: &str, account: AccountType) -> Result<Amount, StatementError> {
    find_balance(text, account, BalanceKind::Opening)
}

pub fn closing_balance(text: &str, account: AccountType) -> Result<Amount, StatementError> {
    find_balance(text, account, BalanceKind::Closing)
}

pub fn extract_balances(text: &str, account: AccountType) -> Result<Balances, StatementError> {
    Ok(Balances {
        opening: opening_balance(text, account)?,
        closing: closing_balance(text, account)?,
    })
}
