pub mod recipient_data_source;
pub mod recipient_tables;

pub use recipient_data_source::RecipientDataSource;
pub use recipient_tables::RecipientTable;
