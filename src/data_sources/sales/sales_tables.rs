/// Provides constants for working with the "sales" input table.
pub struct SalesTable;

impl SalesTable {
	/// File stem of the table inside the data sources directory.
	pub const TABLE_NAME: &'static str = "sales";

	/// Identifier shared by every line of one sale (one ticket).
	pub const COLUMN_SALES_CODE: &'static str = "sales_code";

	/// Calendar day of the sale.
	pub const COLUMN_DATE: &'static str = "date";

	pub const COLUMN_STORE_ID: &'static str = "store_id";

	pub const COLUMN_PRODUCT_ID: &'static str = "product_id";

	pub const COLUMN_QUANTITY: &'static str = "quantity";

	pub const COLUMN_UNIT_PRICE: &'static str = "unit_price";

	/// Columns that must be present after name standardization.
	pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
		Self::COLUMN_SALES_CODE,
		Self::COLUMN_DATE,
		Self::COLUMN_STORE_ID,
		Self::COLUMN_PRODUCT_ID,
		Self::COLUMN_QUANTITY,
		Self::COLUMN_UNIT_PRICE,
	];
}
