/// Provides constants for working with the "stores" input table.
pub struct StoreTable;

impl StoreTable {
	pub const TABLE_NAME: &'static str = "stores";

	pub const COLUMN_STORE_ID: &'static str = "store_id";

	pub const COLUMN_STORE_NAME: &'static str = "store_name";

	pub const REQUIRED_COLUMNS: &'static [&'static str] =
		&[Self::COLUMN_STORE_ID, Self::COLUMN_STORE_NAME];
}
