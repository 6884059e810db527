//! Year inference for statement dates printed as day + month only.
//!
//! Statements print `JAN 05` or `05 JAN` and leave the year implicit. A
//! [`YearCursor`] is seeded with the statement's starting year and walks the
//! transactions in document order, bumping the year when the month sequence
//! crosses a calendar boundary.

use chrono::NaiveDate;

use crate::error::FormatError;

/// Month number for a three-letter English abbreviation (any case).
pub fn parse_month(token: &str) -> Result<u32, FormatError> {
    let month = match token.trim().to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return Err(FormatError::Month(token.to_string())),
    };
    Ok(month)
}

fn parse_day(token: &str) -> Result<u32, FormatError> {
    token
        .trim()
        .parse()
        .map_err(|_| FormatError::Day(token.to_string()))
}

/// How a month transition moves the running year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    /// Dec -> Jan moves forward a year. With `backward`, Jan -> Dec moves
    /// back a year (statements that print an old December charge after the
    /// January ones). Any other transition keeps the year.
    Boundary { backward: bool },
    /// Any month lower than the previous one moves forward a year.
    Wrap,
}

impl Default for Rollover {
    fn default() -> Self {
        Rollover::Boundary { backward: true }
    }
}

/// Running year state for one statement's extraction.
#[derive(Debug, Clone)]
pub struct YearCursor {
    year: i32,
    last_month: Option<u32>,
    rollover: Rollover,
}

impl YearCursor {
    pub fn new(start_year: i32, rollover: Rollover) -> Self {
        Self {
            year: start_year,
            last_month: None,
            rollover,
        }
    }

    pub fn last_month(&self) -> Option<u32> {
        self.last_month
    }

    /// Year `month` falls in if it is the next month seen. Does not move the
    /// cursor.
    fn year_for(&self, month: u32) -> i32 {
        let Some(prev) = self.last_month else {
            return self.year;
        };
        match self.rollover {
            Rollover::Boundary { .. } if prev == 12 && month == 1 => self.year + 1,
            Rollover::Boundary { backward: true } if prev == 1 && month == 12 => self.year - 1,
            Rollover::Wrap if month < prev => self.year + 1,
            _ => self.year,
        }
    }

    /// Record `month` as the next month seen and return the year it falls in.
    pub fn observe(&mut self, month: u32) -> i32 {
        self.year = self.year_for(month);
        self.last_month = Some(month);
        self.year
    }

    /// Resolve a day/month pair into a full date. The cursor only advances
    /// when the date exists.
    pub fn resolve(&mut self, day: u32, month: u32) -> Result<NaiveDate, FormatError> {
        let year = self.year_for(month);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| FormatError::Date(format!("{year}-{month:02}-{day:02}")))?;
        self.observe(month);
        Ok(date)
    }

    /// Resolve `MMM DD` (e.g. `JAN 05`).
    pub fn resolve_month_day(&mut self, token: &str) -> Result<NaiveDate, FormatError> {
        let (month, day) = split_pair(token)?;
        let month = parse_month(month)?;
        let day = parse_day(day)?;
        self.resolve(day, month)
    }

    /// Resolve `DD MMM` (e.g. `05 JAN`).
    pub fn resolve_day_month(&mut self, token: &str) -> Result<NaiveDate, FormatError> {
        let (day, month) = split_pair(token)?;
        let day = parse_day(day)?;
        let month = parse_month(month)?;
        self.resolve(day, month)
    }
}

fn split_pair(token: &str) -> Result<(&str, &str), FormatError> {
    let mut parts = token.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(FormatError::Date(token.to_string())),
    }
}
