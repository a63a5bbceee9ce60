/// Provides constants for working with the "emails" input table, which maps
/// each store (and the board) to the person receiving its report.
pub struct RecipientTable;

impl RecipientTable {
	pub const TABLE_NAME: &'static str = "emails";

	/// Store identifier, or `BOARD` for the aggregate recipient.
	pub const COLUMN_STORE_ID: &'static str = "store_id";

	/// Full name of the store manager.
	pub const COLUMN_MANAGER: &'static str = "manager";

	pub const COLUMN_EMAIL: &'static str = "email";

	pub const REQUIRED_COLUMNS: &'static [&'static str] =
		&[Self::COLUMN_STORE_ID, Self::COLUMN_MANAGER, Self::COLUMN_EMAIL];
}
