//! # Reports
//!
//! Date-range selection and aggregates over archived bills. The output is
//! plain records; drawing tables and charts is the caller's concern.
//!
//! ## Range Bounds
//! ```text
//!   DateRange { start: 2024-03-01, end: 2024-03-31 }
//!
//!   2024-03-01 00:00:00.000  ≤  bill.timestamp  ≤  2024-03-31 23:59:59.999
//!
//!   start only → on or after start day
//!   end only   → on or before end day
//!   neither    → every bill
//! ```
//!
//! Bounds compare calendar dates, so both ends are inclusive by day.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::sum_round2;
use crate::types::Bill;
use crate::validation::{parse_range_date, ValidationResult};

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive calendar-day range with optional ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Every bill.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn starting(start: NaiveDate) -> Self {
        DateRange {
            start: Some(start),
            end: None,
        }
    }

    pub fn ending(end: NaiveDate) -> Self {
        DateRange {
            start: None,
            end: Some(end),
        }
    }

    /// Builds a range from optional `YYYY-MM-DD` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::report::DateRange;
    ///
    /// let march = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
    /// assert!(march.start.is_some() && march.end.is_some());
    /// assert!(DateRange::parse(Some("01-03-2024"), None).is_err());
    /// ```
    pub fn parse(start: Option<&str>, end: Option<&str>) -> ValidationResult<Self> {
        let start = start
            .filter(|s| !s.trim().is_empty())
            .map(parse_range_date)
            .transpose()?;
        let end = end
            .filter(|s| !s.trim().is_empty())
            .map(parse_range_date)
            .transpose()?;

        Ok(DateRange { start, end })
    }

    /// Whether a timestamp's calendar date falls inside the range.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let day = timestamp.date();
        self.start.map_or(true, |start| day >= start) && self.end.map_or(true, |end| day <= end)
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Named ranges relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
    Today,
    /// Sunday of the current week through today.
    Week,
    /// First through last day of the current month.
    Month,
    /// January 1 through December 31 of the current year.
    Year,
    All,
}

impl RangePreset {
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            RangePreset::Today => DateRange::between(today, today),
            RangePreset::Week => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let sunday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
                DateRange::between(sunday, today)
            }
            RangePreset::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                DateRange::between(first, last)
            }
            RangePreset::Year => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                DateRange::between(first, last)
            }
            RangePreset::All => DateRange::all(),
        }
    }
}

impl FromStr for RangePreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(RangePreset::Today),
            "week" => Ok(RangePreset::Week),
            "month" => Ok(RangePreset::Month),
            "year" => Ok(RangePreset::Year),
            "all" => Ok(RangePreset::All),
            other => Err(ValidationError::invalid_format(
                "preset",
                format!("'{}' is not one of today, week, month, year, all", other),
            )),
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RangePreset::Today => "today",
            RangePreset::Week => "week",
            RangePreset::Month => "month",
            RangePreset::Year => "year",
            RangePreset::All => "all",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Totals over a set of bills.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub bill_count: usize,
    pub total_sales: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

/// One point of the sales chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales: f64,
    pub cost: f64,
    pub profit: f64,
}

pub fn summarize<'a, I>(bills: I) -> SalesSummary
where
    I: IntoIterator<Item = &'a Bill>,
{
    let bills: Vec<&Bill> = bills.into_iter().collect();

    SalesSummary {
        bill_count: bills.len(),
        total_sales: sum_round2(bills.iter().map(|b| b.total_amount)),
        total_cost: sum_round2(bills.iter().map(|b| b.total_cost)),
        total_profit: sum_round2(bills.iter().map(|b| b.profit)),
    }
}

/// Per-day totals, oldest day first.
pub fn daily_totals<'a, I>(bills: I) -> Vec<DailyTotal>
where
    I: IntoIterator<Item = &'a Bill>,
{
    let mut days: BTreeMap<NaiveDate, Vec<&Bill>> = BTreeMap::new();
    for bill in bills {
        days.entry(bill.date).or_default().push(bill);
    }

    days.into_iter()
        .map(|(date, bills)| DailyTotal {
            date,
            sales: sum_round2(bills.iter().map(|b| b.total_amount)),
            cost: sum_round2(bills.iter().map(|b| b.total_cost)),
            profit: sum_round2(bills.iter().map(|b| b.profit)),
        })
        .collect()
}

/// Sorts bills for listing: latest timestamp first, ties by higher sequence.
pub fn newest_first(mut bills: Vec<&Bill>) -> Vec<&Bill> {
    bills.sort_by_key(|bill| Reverse((bill.timestamp, bill.sequence)));
    bills
}

// =============================================================================
// Unit Tests
// =============================================================================
