use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use csv::StringRecord;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Extensions tried, in order, when resolving a table name to a file.
const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "csv"];

/// Reads the input tables from a directory of spreadsheets and CSV files.
pub struct CoreDataSource {
	dir: PathBuf,
}

impl CoreDataSource {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Finds `<table_name>.xlsx` or `<table_name>.csv` in the source directory.
	pub fn resolve(&self, table_name: &str) -> Result<PathBuf> {
		SUPPORTED_EXTENSIONS
			.iter()
			.map(|ext| self.dir.join(format!("{}.{}", table_name, ext)))
			.find(|path| path.is_file())
			.ok_or_else(|| AppError::MissingInput {
				table: table_name.to_string(),
				dir: self.dir.clone(),
			})
	}

	pub fn load_table(&self, table_name: &str) -> Result<RawTable> {
		let path = self.resolve(table_name)?;
		let table = match path.extension().and_then(|ext| ext.to_str()) {
			Some("csv") => RawTable::from_csv(table_name, File::open(&path)?)?,
			_ => RawTable::from_xlsx(table_name, &path)?,
		};

		tracing::debug!(
			"Loaded table {} from {} ({} rows)",
			table_name,
			path.display(),
			table.len()
		);
		Ok(table)
	}
}

/// A table with standardized column names and every cell as text.
#[derive(Debug, Clone)]
pub struct RawTable {
	name: String,
	headers: StringRecord,
	rows: Vec<StringRecord>,
}

impl RawTable {
	pub fn from_csv<R: Read>(name: &str, reader: R) -> Result<Self> {
		let mut csv_reader = csv::ReaderBuilder::new()
			.has_headers(true)
			.trim(csv::Trim::All)
			.from_reader(reader);

		let headers = standardize_headers(csv_reader.headers()?.iter());
		if headers.is_empty() {
			return Err(AppError::EmptyTable {
				table: name.to_string(),
			});
		}

		let mut rows = Vec::new();
		for record in csv_reader.records() {
			let record = record?;
			if !is_blank(&record) {
				rows.push(record);
			}
		}

		Ok(Self {
			name: name.to_string(),
			headers,
			rows,
		})
	}

	pub fn from_xlsx(name: &str, path: &Path) -> Result<Self> {
		let mut workbook: Xlsx<_> = open_workbook(path)?;

		let sheet_names = workbook.sheet_names().to_vec();
		let first_sheet = sheet_names.first().ok_or_else(|| AppError::EmptyTable {
			table: name.to_string(),
		})?;
		let range = workbook.worksheet_range(first_sheet)?;

		let mut rows_iter = range.rows();
		let headers = match rows_iter.next() {
			Some(row) => standardize_headers(row.iter().map(cell_to_string)),
			None => {
				return Err(AppError::EmptyTable {
					table: name.to_string(),
				});
			}
		};

		let rows = rows_iter
			.map(|row| row.iter().map(cell_to_string).collect::<StringRecord>())
			.filter(|record| !is_blank(record))
			.collect();

		Ok(Self {
			name: name.to_string(),
			headers,
			rows,
		})
	}

	pub fn headers(&self) -> &StringRecord {
		&self.headers
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn require_columns(&self, required: &[&str]) -> Result<()> {
		for column in required {
			if !self.headers.iter().any(|header| header == *column) {
				return Err(AppError::MissingColumn {
					table: self.name.clone(),
					column: column.to_string(),
				});
			}
		}
		Ok(())
	}

	/// Deserializes every row into `T`, matching fields by standardized column name.
	pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
		self.rows
			.iter()
			.enumerate()
			.map(|(index, row)| {
				row.deserialize(Some(&self.headers))
					.map_err(|e| AppError::MalformedRow {
						table: self.name.clone(),
						// header is line 1
						line: index + 2,
						message: e.to_string(),
					})
			})
			.collect()
	}
}

/// Lowercases a column name and replaces spaces with underscores.
pub fn standardize_column_name(name: &str) -> String {
	name.trim().to_lowercase().replace(' ', "_")
}

/// Turns a standardized column name back into a title-cased header.
pub fn restore_column_name(name: &str) -> String {
	name.split('_')
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}

fn standardize_headers<I, S>(headers: I) -> StringRecord
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
	headers
		.map(|header| standardize_column_name(header.as_ref()))
		.collect()
}

fn is_blank(record: &StringRecord) -> bool {
	record.iter().all(|field| field.trim().is_empty())
}

fn cell_to_string(cell: &Data) -> String {
	match cell {
		Data::Empty => String::new(),
		Data::String(s) => s.trim().to_string(),
		Data::Float(f) => {
			if f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0 {
				format!("{:.0}", f)
			} else {
				f.to_string()
			}
		}
		Data::Int(i) => i.to_string(),
		Data::Bool(b) => b.to_string(),
		Data::DateTime(serial) => match serial.as_datetime() {
			Some(datetime) => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
			None => serial.to_string(),
		},
		Data::DateTimeIso(s) => s.clone(),
		Data::DurationIso(s) => s.clone(),
		Data::Error(e) => format!("#ERROR:{:?}", e),
	}
}
