use std::sync::Arc;

use crate::data_sources::core_data_source::CoreDataSource;
use crate::data_sources::stores::store_tables::StoreTable;
use crate::error::Result;
use crate::models::Store;

pub struct StoreDataSource {
	core_source: Arc<CoreDataSource>,
}

impl StoreDataSource {
	pub fn new(core_source: Arc<CoreDataSource>) -> Self {
		Self { core_source }
	}

	pub fn load_stores(&self) -> Result<Vec<Store>> {
		let table = self.core_source.load_table(StoreTable::TABLE_NAME)?;
		table.require_columns(StoreTable::REQUIRED_COLUMNS)?;
		table.deserialize()
	}
}
