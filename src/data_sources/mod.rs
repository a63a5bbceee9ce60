pub mod core_data_source;
pub mod products;
pub mod recipients;
pub mod sales;
pub mod stores;

use std::sync::Arc;

pub use core_data_source::{CoreDataSource, RawTable};

use crate::error::Result;
use crate::models::{Product, RecipientMapping, SaleLine, Store};
use products::ProductDataSource;
use recipients::RecipientDataSource;
use sales::SalesDataSource;
use stores::StoreDataSource;

/// Every input table of a run, loaded once and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
	pub recipients: Vec<RecipientMapping>,
	pub products: Vec<Product>,
	pub stores: Vec<Store>,
	pub sales: Vec<SaleLine>,
}

impl ReportInputs {
	pub fn load(core: Arc<CoreDataSource>) -> Result<Self> {
		let inputs = Self {
			recipients: RecipientDataSource::new(core.clone()).load_recipients()?,
			products: ProductDataSource::new(core.clone()).load_products()?,
			stores: StoreDataSource::new(core.clone()).load_stores()?,
			sales: SalesDataSource::new(core).load_sales()?,
		};

		tracing::info!(
			recipients = inputs.recipients.len(),
			products = inputs.products.len(),
			stores = inputs.stores.len(),
			sales = inputs.sales.len(),
			"Input tables loaded"
		);
		Ok(inputs)
	}
}
