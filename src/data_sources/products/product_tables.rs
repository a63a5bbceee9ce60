/// Provides constants for working with the "products" input table.
pub struct ProductTable;

impl ProductTable {
	pub const TABLE_NAME: &'static str = "products";

	pub const COLUMN_PRODUCT_ID: &'static str = "product_id";

	pub const COLUMN_PRODUCT_NAME: &'static str = "product_name";

	pub const REQUIRED_COLUMNS: &'static [&'static str] =
		&[Self::COLUMN_PRODUCT_ID, Self::COLUMN_PRODUCT_NAME];
}
