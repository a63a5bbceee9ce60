use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Time range a KPI is computed over, anchored on the reported day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodWindow {
	/// The reported day only.
	Daily,
	/// From January 1st of the reported day's year through the reported day.
	YearToDate,
}

impl PeriodWindow {
	pub fn contains(&self, date: NaiveDate, yesterday: NaiveDate) -> bool {
		match self {
			PeriodWindow::Daily => date == yesterday,
			PeriodWindow::YearToDate => date.year() == yesterday.year() && date <= yesterday,
		}
	}
}

impl fmt::Display for PeriodWindow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PeriodWindow::Daily => write!(f, "daily"),
			PeriodWindow::YearToDate => write!(f, "year-to-date"),
		}
	}
}

/// Indicators of one store over one period window
#[derive(Debug, Clone, PartialEq)]
pub struct StoreKpiRow {
	pub store_id: String,
	pub revenue: f64,
	pub distinct_products: usize,
	pub avg_ticket: f64,
}

/// Daily and year-to-date indicators of one store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreKpiSummary {
	pub store_id: String,
	pub daily: StoreKpiRow,
	pub yearly: StoreKpiRow,
}

/// Thresholds a store is measured against for one period window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiTargets {
	pub revenue: f64,
	pub distinct_products: f64,
	pub avg_ticket: f64,
}

impl KpiTargets {
	pub fn daily_defaults() -> Self {
		Self {
			revenue: 1_000.0,
			distinct_products: 4.0,
			avg_ticket: 500.0,
		}
	}

	pub fn yearly_defaults() -> Self {
		Self {
			revenue: 1_650_000.0,
			distinct_products: 120.0,
			avg_ticket: 500.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn day(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	#[test]
	fn daily_window_is_a_single_day() {
		let yesterday = day(2024, 5, 10);
		assert!(PeriodWindow::Daily.contains(day(2024, 5, 10), yesterday));
		assert!(!PeriodWindow::Daily.contains(day(2024, 5, 9), yesterday));
		assert!(!PeriodWindow::Daily.contains(day(2024, 5, 11), yesterday));
	}

	#[test]
	fn year_to_date_stops_at_yesterday_and_year_start() {
		let yesterday = day(2024, 5, 10);
		assert!(PeriodWindow::YearToDate.contains(day(2024, 1, 1), yesterday));
		assert!(PeriodWindow::YearToDate.contains(day(2024, 5, 10), yesterday));
		assert!(!PeriodWindow::YearToDate.contains(day(2024, 5, 11), yesterday));
		assert!(!PeriodWindow::YearToDate.contains(day(2023, 12, 31), yesterday));
	}
}
