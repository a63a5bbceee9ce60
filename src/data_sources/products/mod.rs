pub mod product_data_source;
pub mod product_tables;

pub use product_data_source::ProductDataSource;
pub use product_tables::ProductTable;
