use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Deserialize;

use crate::data_sources::RawTable;
use crate::data_sources::core_data_source::restore_column_name;
use crate::error::Result;
use crate::models::sale::deserialize_quantity;
use crate::models::{PeriodWindow, Product, Ranking, SaleLine, Store};

/// Directory under the output root holding the ranking spreadsheets.
pub const BOARD_DIR_NAME: &str = "board_of_directors";

/// Date layout used in exported spreadsheets.
pub const EXPORT_DATE_FORMAT: &str = "%Y/%m/%d";

const STORE_SALES_COLUMNS: &[&str] = &[
	"sales_code",
	"date",
	"product_name",
	"store_name",
	"quantity",
	"unit_price",
];

const RANKING_COLUMNS: &[&str] = &["store_id", "store_name", "revenue"];

/// One row of a store's year-to-date sales detail export
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedSaleLine {
	pub sales_code: String,
	/// Formatted with [`EXPORT_DATE_FORMAT`].
	pub date: String,
	pub product_name: String,
	pub store_name: String,
	#[serde(deserialize_with = "deserialize_quantity")]
	pub quantity: i64,
	pub unit_price: f64,
}

/// Case-folds a store name and replaces spaces with underscores for use in paths.
pub fn store_safe_name(store_name: &str) -> String {
	fold_case(store_name).replace(' ', "_")
}

/// Unicode lowercase plus the full case-folding expansions and the folds of
/// Latin and Greek letters whose lowercase form is not their folded form.
fn fold_case(text: &str) -> String {
	let mut folded = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'ß' | 'ẞ' => folded.push_str("ss"),
			'ŉ' => folded.push_str("ʼn"),
			'ﬀ' => folded.push_str("ff"),
			'ﬁ' => folded.push_str("fi"),
			'ﬂ' => folded.push_str("fl"),
			'ﬃ' => folded.push_str("ffi"),
			'ﬄ' => folded.push_str("ffl"),
			'ﬅ' | 'ﬆ' => folded.push_str("st"),
			'ſ' => folded.push('s'),
			'ς' => folded.push('σ'),
			'ϐ' => folded.push('β'),
			'ϑ' => folded.push('θ'),
			'ϕ' => folded.push('φ'),
			'ϖ' => folded.push('π'),
			'ϰ' => folded.push('κ'),
			'ϱ' => folded.push('ρ'),
			'ϵ' => folded.push('ε'),
			'ẛ' => folded.push('ṡ'),
			'\u{345}' => folded.push('ι'),
			_ => folded.extend(c.to_lowercase()),
		}
	}
	folded
}

/// Sale lines of `store`, joined with product and store names.
///
/// Lines whose product is unknown are left out.
pub fn store_sales_rows(lines: &[&SaleLine], store: &Store, products: &[Product]) -> Vec<ExportedSaleLine> {
	let product_names: HashMap<&str, &str> = products
		.iter()
		.map(|p| (p.product_id.as_str(), p.product_name.as_str()))
		.collect();

	lines
		.iter()
		.filter(|line| line.store_id == store.store_id)
		.filter_map(|line| {
			product_names
				.get(line.product_id.as_str())
				.map(|product_name| ExportedSaleLine {
					sales_code: line.sales_code.clone(),
					date: line.date.format(EXPORT_DATE_FORMAT).to_string(),
					product_name: product_name.to_string(),
					store_name: store.store_name.clone(),
					quantity: line.quantity,
					unit_price: line.unit_price,
				})
		})
		.collect()
}

/// Writes the spreadsheets backing the emails.
pub struct ExportService {
	output_dir: PathBuf,
}

impl ExportService {
	pub fn new(output_dir: impl Into<PathBuf>) -> Self {
		Self {
			output_dir: output_dir.into(),
		}
	}

	pub fn store_dir(&self, store: &Store) -> PathBuf {
		self.output_dir.join(store_safe_name(&store.store_name))
	}

	pub fn store_sales_path(&self, store: &Store) -> PathBuf {
		let safe_name = store_safe_name(&store.store_name);
		self.store_dir(store).join(format!("{}_sales.xlsx", safe_name))
	}

	pub fn board_dir(&self) -> PathBuf {
		self.output_dir.join(BOARD_DIR_NAME)
	}

	/// Daily rankings are stamped with the day, yearly rankings with the year only.
	pub fn ranking_path(&self, ranking: &Ranking, yesterday: NaiveDate) -> PathBuf {
		let file_name = match ranking.window {
			PeriodWindow::Daily => {
				format!("daily_ranking_{}.xlsx", yesterday.format("%Y_%m_%d"))
			}
			PeriodWindow::YearToDate => {
				format!("yearly_ranking_{}.xlsx", yesterday.year())
			}
		};
		self.board_dir().join(file_name)
	}

	/// Writes a store's year-to-date detail, replacing any previous export.
	pub fn write_store_sales(&self, store: &Store, rows: &[ExportedSaleLine]) -> Result<PathBuf> {
		fs::create_dir_all(self.store_dir(store))?;
		let path = self.store_sales_path(store);

		let mut workbook = Workbook::new();
		let worksheet = workbook.add_worksheet();
		write_header(worksheet, STORE_SALES_COLUMNS)?;

		for (index, row) in rows.iter().enumerate() {
			let r = index as u32 + 1;
			worksheet.write_string(r, 0, &row.sales_code)?;
			worksheet.write_string(r, 1, &row.date)?;
			worksheet.write_string(r, 2, &row.product_name)?;
			worksheet.write_string(r, 3, &row.store_name)?;
			worksheet.write_number(r, 4, row.quantity as f64)?;
			worksheet.write_number(r, 5, row.unit_price)?;
		}

		workbook.save(&path)?;
		tracing::info!("Store export written: {} ({} rows)", path.display(), rows.len());
		Ok(path)
	}

	pub fn write_ranking(&self, ranking: &Ranking, yesterday: NaiveDate) -> Result<PathBuf> {
		fs::create_dir_all(self.board_dir())?;
		let path = self.ranking_path(ranking, yesterday);

		let mut workbook = Workbook::new();
		let worksheet = workbook.add_worksheet();
		write_header(worksheet, RANKING_COLUMNS)?;

		for (index, row) in ranking.rows.iter().enumerate() {
			let r = index as u32 + 1;
			worksheet.write_string(r, 0, &row.store_id)?;
			worksheet.write_string(r, 1, &row.store_name)?;
			worksheet.write_number(r, 2, row.revenue)?;
		}

		workbook.save(&path)?;
		tracing::info!("Ranking written: {}", path.display());
		Ok(path)
	}
}

/// Reads a store export back into typed rows.
pub fn read_store_sales(path: &Path) -> Result<Vec<ExportedSaleLine>> {
	let table = RawTable::from_xlsx("store_sales", path)?;
	table.require_columns(STORE_SALES_COLUMNS)?;
	table.deserialize()
}

fn write_header(worksheet: &mut Worksheet, columns: &[&str]) -> Result<()> {
	let bold = Format::new().set_bold();
	for (col, column) in columns.iter().enumerate() {
		worksheet.write_string_with_format(0, col as u16, restore_column_name(column), &bold)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::RankingRow;
	use uuid::Uuid;

	fn setup_output_dir() -> PathBuf {
		std::env::temp_dir().join(format!("onepage_export_{}", Uuid::new_v4()))
	}

	fn teardown_output_dir(dir: &Path) {
		if dir.exists() {
			fs::remove_dir_all(dir).expect("Failed to remove test output directory");
		}
	}

	fn sale(code: &str, store: &str, product: &str, quantity: i64, price: f64) -> SaleLine {
		SaleLine {
			sales_code: code.to_string(),
			date: NaiveDate::from_ymd_opt(2024, 2, 7).unwrap(),
			store_id: store.to_string(),
			product_id: product.to_string(),
			quantity,
			unit_price: price,
		}
	}

	fn downtown() -> Store {
		Store {
			store_id: "S1".to_string(),
			store_name: "Downtown Central".to_string(),
		}
	}

	#[test]
	fn safe_name_is_casefolded() {
		assert_eq!(store_safe_name("Downtown Central"), "downtown_central");
		assert_eq!(store_safe_name("Große Straße"), "grosse_strasse");
		assert_eq!(store_safe_name("ΣΟΦΙΑΣ Café"), "σοφιασ_café");
		assert_eq!(store_safe_name("Old ﬁeld"), "old_field");
	}

	#[test]
	fn store_rows_are_joined_with_names() {
		let products = vec![Product {
			product_id: "P1".to_string(),
			product_name: "Espresso Beans".to_string(),
		}];
		let sales = vec![
			sale("1001", "S1", "P1", 2, 10.0),
			sale("1002", "S2", "P1", 1, 10.0),
			sale("1003", "S1", "P404", 1, 10.0),
		];
		let refs: Vec<&SaleLine> = sales.iter().collect();
		let rows = store_sales_rows(&refs, &downtown(), &products);

		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].date, "2024/02/07");
		assert_eq!(rows[0].product_name, "Espresso Beans");
		assert_eq!(rows[0].store_name, "Downtown Central");
	}

	#[test]
	fn store_export_round_trips() {
		let output_dir = setup_output_dir();
		let service = ExportService::new(output_dir.clone());
		let rows = vec![
			ExportedSaleLine {
				sales_code: "1001".to_string(),
				date: "2024/02/07".to_string(),
				product_name: "Espresso Beans".to_string(),
				store_name: "Downtown Central".to_string(),
				quantity: 2,
				unit_price: 10.5,
			},
			ExportedSaleLine {
				sales_code: "1002".to_string(),
				date: "2024/02/08".to_string(),
				product_name: "Milk".to_string(),
				store_name: "Downtown Central".to_string(),
				quantity: 1,
				unit_price: 3.25,
			},
		];

		let path = service.write_store_sales(&downtown(), &rows).unwrap();
		assert_eq!(
			path,
			output_dir.join("downtown_central").join("downtown_central_sales.xlsx")
		);

		let read_back = read_store_sales(&path).unwrap();
		assert_eq!(read_back, rows);

		// a second run overwrites the same file
		let path_again = service.write_store_sales(&downtown(), &rows[..1]).unwrap();
		assert_eq!(path_again, path);
		assert_eq!(read_store_sales(&path).unwrap().len(), 1);

		teardown_output_dir(&output_dir);
	}

	#[test]
	fn ranking_files_are_stamped_by_day_and_year() {
		let output_dir = setup_output_dir();
		let service = ExportService::new(output_dir.clone());
		let row = RankingRow {
			store_id: "S1".to_string(),
			store_name: "Downtown".to_string(),
			revenue: 20.0,
		};
		let daily = Ranking {
			window: PeriodWindow::Daily,
			rows: vec![row.clone()],
			best: row.clone(),
			worst: row.clone(),
		};
		let yearly = Ranking {
			window: PeriodWindow::YearToDate,
			..daily.clone()
		};
		let yesterday = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();

		let daily_path = service.write_ranking(&daily, yesterday).unwrap();
		let yearly_path = service.write_ranking(&yearly, yesterday).unwrap();

		assert_eq!(
			daily_path,
			output_dir.join(BOARD_DIR_NAME).join("daily_ranking_2024_05_10.xlsx")
		);
		assert_eq!(
			yearly_path,
			output_dir.join(BOARD_DIR_NAME).join("yearly_ranking_2024.xlsx")
		);
		assert!(daily_path.is_file());
		assert!(yearly_path.is_file());

		let table = RawTable::from_xlsx("ranking", &daily_path).unwrap();
		assert_eq!(
			table.headers().iter().collect::<Vec<_>>(),
			vec!["store_id", "store_name", "revenue"]
		);
		assert_eq!(table.len(), 1);

		teardown_output_dir(&output_dir);
	}
}
