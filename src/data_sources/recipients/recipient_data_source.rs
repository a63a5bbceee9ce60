use std::sync::Arc;

use crate::data_sources::core_data_source::CoreDataSource;
use crate::data_sources::recipients::recipient_tables::RecipientTable;
use crate::error::Result;
use crate::models::RecipientMapping;

pub struct RecipientDataSource {
	core_source: Arc<CoreDataSource>,
}

impl RecipientDataSource {
	pub fn new(core_source: Arc<CoreDataSource>) -> Self {
		Self { core_source }
	}

	pub fn load_recipients(&self) -> Result<Vec<RecipientMapping>> {
		let table = self.core_source.load_table(RecipientTable::TABLE_NAME)?;
		table.require_columns(RecipientTable::REQUIRED_COLUMNS)?;

		let recipients: Vec<RecipientMapping> = table.deserialize()?;
		if !recipients.iter().any(RecipientMapping::is_board) {
			tracing::warn!("Recipients table has no BOARD row");
		}
		Ok(recipients)
	}
}
