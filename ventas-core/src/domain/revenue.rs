//! Revenue aggregates and analysis results

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// A calendar month without a day, ordered by calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Total revenue per calendar month.
///
/// Only months that had sales appear; iteration is in calendar order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyRevenue(BTreeMap<YearMonth, f64>);

impl MonthlyRevenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the month's running total
    pub fn add(&mut self, month: YearMonth, amount: f64) {
        *self.0.entry(month).or_insert(0.0) += amount;
    }

    pub fn get(&self, month: YearMonth) -> Option<f64> {
        self.0.get(&month).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Months in calendar order with their totals
    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }
}

impl FromIterator<(YearMonth, f64)> for MonthlyRevenue {
    fn from_iter<T: IntoIterator<Item = (YearMonth, f64)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (month, amount) in iter {
            out.add(month, amount);
        }
        out
    }
}

/// Product with the highest summed value of some measure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub product: String,
    pub value: f64,
}

/// Output of the analysis stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub top_by_quantity: Option<TopProduct>,
    pub top_by_revenue: Option<TopProduct>,
    pub monthly: MonthlyRevenue,
}

impl Analysis {
    /// The neutral result used when the input cannot be analyzed
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Counters collected while cleaning the input file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Data rows read from the file (header excluded)
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Dates rewritten by the known-literal repair
    pub dates_repaired: usize,
    pub dropped_missing: usize,
    pub dropped_invalid_date: usize,
    pub dropped_invalid_number: usize,
    pub dropped_non_positive: usize,
}

impl CleanReport {
    pub fn dropped(&self) -> usize {
        self.dropped_missing
            + self.dropped_invalid_date
            + self.dropped_invalid_number
            + self.dropped_non_positive
    }
}

/// Format an amount as `$` plus a thousands-grouped integer.
///
/// The sign goes after the currency symbol (`$-1,200`).
pub fn format_currency(value: f64) -> String {
    format!("${}", group_thousands(&format!("{:.0}", value)))
}

/// Format a summed quantity with the shortest exact representation.
pub fn format_quantity(value: f64) -> String {
    format!("{}", value)
}

fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        // inf / NaN
        return number.to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}
