use super::PeriodWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
	pub store_id: String,
	pub store_name: String,
	pub revenue: f64,
}

/// Stores ordered by revenue for one window, best first.
///
/// `rank_stores` refuses an empty window, so the rankings it returns have at
/// least one row. With a single store `best` and `worst` are the same row.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
	pub window: PeriodWindow,
	pub rows: Vec<RankingRow>,
	pub best: RankingRow,
	pub worst: RankingRow,
}
