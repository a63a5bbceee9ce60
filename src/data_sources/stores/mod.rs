pub mod store_data_source;
pub mod store_tables;

pub use store_data_source::StoreDataSource;
pub use store_tables::StoreTable;
