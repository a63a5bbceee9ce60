use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::PeriodWindow;

#[derive(Error, Debug)]
pub enum AppError {
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("Input table '{table}' not found in {}", dir.display())]
	MissingInput { table: String, dir: PathBuf },

	#[error("Input table '{table}' has no header row")]
	EmptyTable { table: String },

	#[error("Input table '{table}' is missing required column '{column}'")]
	MissingColumn { table: String, column: String },

	#[error("Malformed row {line} in '{table}': {message}")]
	MalformedRow {
		table: String,
		line: usize,
		message: String,
	},

	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	#[error("Spreadsheet read error: {0}")]
	Spreadsheet(#[from] calamine::XlsxError),

	#[error("Spreadsheet write error: {0}")]
	Xlsx(#[from] rust_xlsxwriter::XlsxError),

	#[error("No stores with sales in the {0} window")]
	EmptyRanking(PeriodWindow),

	#[error("No BOARD recipient in the recipients table")]
	MissingBoardRecipient,

	#[error("Mail error: {0}")]
	Mail(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
