use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::{PeriodWindow, Product, SaleLine, Store, StoreKpiRow, StoreKpiSummary};

/// KPI rows of one run: each window on its own plus the per-store merge.
#[derive(Debug, Clone, Default)]
pub struct KpiReport {
	pub daily: Vec<StoreKpiRow>,
	pub yearly: Vec<StoreKpiRow>,
	/// Stores with sales in both windows only.
	pub combined: Vec<StoreKpiSummary>,
}

impl KpiReport {
	pub fn for_window(&self, window: PeriodWindow) -> &[StoreKpiRow] {
		match window {
			PeriodWindow::Daily => &self.daily,
			PeriodWindow::YearToDate => &self.yearly,
		}
	}

	pub fn summary_for(&self, store_id: &str) -> Option<&StoreKpiSummary> {
		self.combined.iter().find(|summary| summary.store_id == store_id)
	}
}

/// Computes revenue, distinct products and average ticket per store.
pub struct KpiService<'a> {
	products: HashSet<&'a str>,
	stores: HashSet<&'a str>,
}

#[derive(Default)]
struct StoreAccumulator<'a> {
	revenue: f64,
	products: HashSet<&'a str>,
	sales_codes: HashSet<&'a str>,
}

impl<'a> KpiService<'a> {
	pub fn new(products: &'a [Product], stores: &'a [Store]) -> Self {
		Self {
			products: products.iter().map(|p| p.product_id.as_str()).collect(),
			stores: stores.iter().map(|s| s.store_id.as_str()).collect(),
		}
	}

	/// Builds the daily, year-to-date and combined KPI sets for `yesterday`.
	pub fn compute(&self, sales: &'a [SaleLine], yesterday: NaiveDate) -> KpiReport {
		let daily = self.aggregate(&filter_period(sales, PeriodWindow::Daily, yesterday));
		let yearly = self.aggregate(&filter_period(sales, PeriodWindow::YearToDate, yesterday));
		let combined = merge_periods(&daily, &yearly);

		tracing::info!(
			%yesterday,
			daily_stores = daily.len(),
			yearly_stores = yearly.len(),
			combined_stores = combined.len(),
			"KPIs computed"
		);

		KpiReport {
			daily,
			yearly,
			combined,
		}
	}

	/// Sale lines whose product and store both exist in the reference tables.
	pub fn is_matched(&self, line: &SaleLine) -> bool {
		self.products.contains(line.product_id.as_str()) && self.stores.contains(line.store_id.as_str())
	}

	/// Aggregates sale lines of one window into one row per store, ordered by store id.
	///
	/// Lines with an unknown product or store are dropped. Stores without any
	/// remaining line get no row.
	pub fn aggregate(&self, lines: &[&'a SaleLine]) -> Vec<StoreKpiRow> {
		let mut by_store: BTreeMap<&'a str, StoreAccumulator<'a>> = BTreeMap::new();

		for line in lines.iter().copied().filter(|line| self.is_matched(line)) {
			let acc = by_store.entry(line.store_id.as_str()).or_default();
			acc.revenue += line.revenue();
			acc.products.insert(line.product_id.as_str());
			acc.sales_codes.insert(line.sales_code.as_str());
		}

		by_store
			.into_iter()
			.map(|(store_id, acc)| StoreKpiRow {
				store_id: store_id.to_string(),
				revenue: acc.revenue,
				distinct_products: acc.products.len(),
				// non-zero: every accumulated line has a sales code
				avg_ticket: acc.revenue / acc.sales_codes.len() as f64,
			})
			.collect()
	}
}

/// Sale lines falling inside `window`, in source order.
pub fn filter_period(sales: &[SaleLine], window: PeriodWindow, yesterday: NaiveDate) -> Vec<&SaleLine> {
	sales
		.iter()
		.filter(|line| window.contains(line.date, yesterday))
		.collect()
}

/// Joins daily and yearly rows on store id. Stores present in only one window are dropped.
pub fn merge_periods(daily: &[StoreKpiRow], yearly: &[StoreKpiRow]) -> Vec<StoreKpiSummary> {
	let yearly_by_store: HashMap<&str, &StoreKpiRow> = yearly
		.iter()
		.map(|row| (row.store_id.as_str(), row))
		.collect();

	daily
		.iter()
		.filter_map(|daily_row| {
			yearly_by_store
				.get(daily_row.store_id.as_str())
				.map(|yearly_row| StoreKpiSummary {
					store_id: daily_row.store_id.clone(),
					daily: daily_row.clone(),
					yearly: (*yearly_row).clone(),
				})
		})
		.collect()
}
