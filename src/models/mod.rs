pub mod kpi;
pub mod ranking;
pub mod sale;

pub use kpi::{KpiTargets, PeriodWindow, StoreKpiRow, StoreKpiSummary};
pub use ranking::{Ranking, RankingRow};
pub use sale::{Product, RecipientMapping, SaleLine, Store};
