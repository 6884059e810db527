use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use teller_core::{AccountType, Amount, Transaction, TransactionSet};

use crate::config::OutputFormat;

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    account_type: AccountType,
    date: NaiveDate,
    timestamp: NaiveDateTime,
    description: &'a str,
    amount: String,
}

#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    account_type: AccountType,
    date: NaiveDate,
    timestamp: NaiveDateTime,
    description: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Amount,
}

impl<'a> From<&'a Transaction> for CsvRecord<'a> {
    fn from(t: &'a Transaction) -> Self {
        Self {
            account_type: t.account_type(),
            date: t.date(),
            timestamp: t.timestamp(),
            description: t.description(),
            amount: format!("{:.2}", t.amount()),
        }
    }
}

impl<'a> From<&'a Transaction> for JsonRecord<'a> {
    fn from(t: &'a Transaction) -> Self {
        Self {
            account_type: t.account_type(),
            date: t.date(),
            timestamp: t.timestamp(),
            description: t.description(),
            amount: t.amount(),
        }
    }
}

pub fn write_csv<W: Write>(writer: W, transactions: &TransactionSet) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for t in transactions {
        wtr.serialize(CsvRecord::from(t)).context("write csv record")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, transactions: &TransactionSet) -> Result<()> {
    let records: Vec<JsonRecord> = transactions.iter().map(JsonRecord::from).collect();
    serde_json::to_writer_pretty(&mut writer, &records).context("write json")?;
    writeln!(writer)?;
    Ok(())
}

/// Write the set to `path`, or stdout when no path is given.
pub fn write_transactions(
    path: Option<&Path>,
    format: OutputFormat,
    transactions: &TransactionSet,
) -> Result<()> {
    let writer: Box<dyn Write> = match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        OutputFormat::Csv => write_csv(writer, transactions),
        OutputFormat::Json => write_json(writer, transactions),
    }
}
