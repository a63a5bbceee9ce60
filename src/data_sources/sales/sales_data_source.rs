use std::sync::Arc;

use crate::data_sources::core_data_source::CoreDataSource;
use crate::data_sources::sales::sales_tables::SalesTable;
use crate::error::Result;
use crate::models::SaleLine;

pub struct SalesDataSource {
	core_source: Arc<CoreDataSource>,
}

impl SalesDataSource {
	pub fn new(core_source: Arc<CoreDataSource>) -> Self {
		Self { core_source }
	}

	pub fn load_sales(&self) -> Result<Vec<SaleLine>> {
		let table = self.core_source.load_table(SalesTable::TABLE_NAME)?;
		table.require_columns(SalesTable::REQUIRED_COLUMNS)?;

		let sales: Vec<SaleLine> = table.deserialize()?;
		tracing::debug!("Loaded {} sale lines", sales.len());
		Ok(sales)
	}
}
