use std::sync::Arc;

use crate::data_sources::core_data_source::CoreDataSource;
use crate::data_sources::products::product_tables::ProductTable;
use crate::error::Result;
use crate::models::Product;

pub struct ProductDataSource {
	core_source: Arc<CoreDataSource>,
}

impl ProductDataSource {
	pub fn new(core_source: Arc<CoreDataSource>) -> Self {
		Self { core_source }
	}

	pub fn load_products(&self) -> Result<Vec<Product>> {
		let table = self.core_source.load_table(ProductTable::TABLE_NAME)?;
		table.require_columns(ProductTable::REQUIRED_COLUMNS)?;
		table.deserialize()
	}
}
