use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{PeriodWindow, Ranking, RankingRow, Store, StoreKpiRow};

/// Ranks the stores of one window by revenue.
///
/// Rows are joined with the stores table (stores without a name are left
/// out), then stable-sorted by descending revenue so equal revenues keep
/// their incoming order. An empty input has no best or worst store and is
/// rejected.
pub fn rank_stores(window: PeriodWindow, rows: &[StoreKpiRow], stores: &[Store]) -> Result<Ranking> {
	let names: HashMap<&str, &str> = stores
		.iter()
		.map(|store| (store.store_id.as_str(), store.store_name.as_str()))
		.collect();

	let mut ranked: Vec<RankingRow> = rows
		.iter()
		.filter_map(|row| {
			names.get(row.store_id.as_str()).map(|name| RankingRow {
				store_id: row.store_id.clone(),
				store_name: name.to_string(),
				revenue: row.revenue,
			})
		})
		.collect();

	sort_by_revenue(&mut ranked);

	let (best, worst) = match (ranked.first(), ranked.last()) {
		(Some(best), Some(worst)) => (best.clone(), worst.clone()),
		_ => return Err(AppError::EmptyRanking(window)),
	};

	tracing::debug!(
		%window,
		stores = ranked.len(),
		best = %best.store_name,
		worst = %worst.store_name,
		"Ranking built"
	);

	Ok(Ranking {
		window,
		rows: ranked,
		best,
		worst,
	})
}

/// Descending by revenue; NaN revenues sink to the end.
fn sort_by_revenue(rows: &mut [RankingRow]) {
	rows.sort_by(|a, b| match (a.revenue.is_nan(), b.revenue.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal),
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kpi(store_id: &str, revenue: f64) -> StoreKpiRow {
		StoreKpiRow {
			store_id: store_id.to_string(),
			revenue,
			distinct_products: 1,
			avg_ticket: revenue,
		}
	}

	fn store(store_id: &str, name: &str) -> Store {
		Store {
			store_id: store_id.to_string(),
			store_name: name.to_string(),
		}
	}

	#[test]
	fn ties_keep_incoming_order() {
		let stores = vec![store("A", "Alpha"), store("B", "Beta"), store("C", "Gamma")];
		let rows = vec![kpi("A", 100.0), kpi("B", 100.0), kpi("C", 50.0)];
		let ranking = rank_stores(PeriodWindow::Daily, &rows, &stores).unwrap();

		assert_eq!(ranking.best.store_id, "A");
		assert_eq!(ranking.best.revenue, 100.0);
		assert_eq!(ranking.worst.store_id, "C");
		assert_eq!(ranking.worst.store_name, "Gamma");
		let order: Vec<&str> = ranking.rows.iter().map(|r| r.store_id.as_str()).collect();
		assert_eq!(order, vec!["A", "B", "C"]);
	}

	#[test]
	fn sorts_descending_by_revenue() {
		let stores = vec![store("A", "Alpha"), store("B", "Beta"), store("C", "Gamma")];
		let rows = vec![kpi("A", 10.0), kpi("B", 300.0), kpi("C", 20.0)];
		let ranking = rank_stores(PeriodWindow::YearToDate, &rows, &stores).unwrap();

		let order: Vec<&str> = ranking.rows.iter().map(|r| r.store_id.as_str()).collect();
		assert_eq!(order, vec!["B", "C", "A"]);
		assert_eq!(ranking.window, PeriodWindow::YearToDate);
	}

	#[test]
	fn single_store_is_best_and_worst() {
		let stores = vec![store("S1", "Downtown")];
		let ranking = rank_stores(PeriodWindow::Daily, &[kpi("S1", 20.0)], &stores).unwrap();

		assert_eq!(ranking.best, ranking.worst);
		assert_eq!(ranking.rows.len(), 1);
	}

	#[test]
	fn stores_without_name_are_left_out() {
		let stores = vec![store("A", "Alpha")];
		let rows = vec![kpi("A", 10.0), kpi("Z", 999.0)];
		let ranking = rank_stores(PeriodWindow::Daily, &rows, &stores).unwrap();

		assert_eq!(ranking.rows.len(), 1);
		assert_eq!(ranking.best.store_id, "A");
	}

	#[test]
	fn empty_window_is_an_error() {
		let stores = vec![store("A", "Alpha")];
		let err = rank_stores(PeriodWindow::Daily, &[], &stores).unwrap_err();
		assert!(matches!(err, AppError::EmptyRanking(PeriodWindow::Daily)));
	}
}
