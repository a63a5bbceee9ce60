pub mod sales_data_source;
pub mod sales_tables;

pub use sales_data_source::SalesDataSource;
pub use sales_tables::SalesTable;
