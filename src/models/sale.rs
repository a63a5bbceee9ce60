use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Store id of the recipients row that addresses the board instead of a store.
pub const BOARD_STORE_ID: &str = "BOARD";

/// One line of a sale, as loaded from the sales table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaleLine {
	pub sales_code: String,
	#[serde(deserialize_with = "deserialize_date")]
	pub date: NaiveDate,
	pub store_id: String,
	pub product_id: String,
	#[serde(deserialize_with = "deserialize_quantity")]
	pub quantity: i64,
	pub unit_price: f64,
}

impl SaleLine {
	pub fn revenue(&self) -> f64 {
		self.quantity as f64 * self.unit_price
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
	pub product_id: String,
	pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Store {
	pub store_id: String,
	pub store_name: String,
}

/// Who receives the report for a store (or the board)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipientMapping {
	pub store_id: String,
	pub manager: String,
	pub email: String,
}

impl RecipientMapping {
	pub fn is_board(&self) -> bool {
		self.store_id == BOARD_STORE_ID
	}

	pub fn first_name(&self) -> &str {
		self.manager.split(' ').next().unwrap_or(&self.manager)
	}
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parses the textual date layouts found in the sales sources.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
	let value = value.trim();
	DATE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(value, format).ok())
		.or_else(|| {
			DATETIME_FORMATS
				.iter()
				.find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
				.map(|datetime| datetime.date())
		})
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
	D: Deserializer<'de>,
{
	let s = String::deserialize(deserializer)?;
	parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
}

/// Accepts whole numbers written either as integers or as floats ("2", "2.0").
pub(crate) fn deserialize_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	let s = String::deserialize(deserializer)?;
	let trimmed = s.trim();
	if let Ok(quantity) = trimmed.parse::<i64>() {
		return Ok(quantity);
	}
	match trimmed.parse::<f64>() {
		Ok(value) if value.fract() == 0.0 => Ok(value as i64),
		_ => Err(serde::de::Error::custom(format!(
			"expected whole quantity, got '{}'",
			s
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_date_accepts_known_layouts() {
		let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
		assert_eq!(parse_date("2024-03-09"), Some(expected));
		assert_eq!(parse_date("2024/03/09"), Some(expected));
		assert_eq!(parse_date("03/09/2024"), Some(expected));
		assert_eq!(parse_date("2024-03-09T00:00:00"), Some(expected));
		assert_eq!(parse_date(" 2024-03-09 13:45:00 "), Some(expected));
		assert_eq!(parse_date("yesterday"), None);
	}

	#[test]
	fn revenue_is_quantity_times_price() {
		let line = SaleLine {
			sales_code: "1".to_string(),
			date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
			store_id: "S1".to_string(),
			product_id: "P1".to_string(),
			quantity: 3,
			unit_price: 12.5,
		};
		assert_eq!(line.revenue(), 37.5);
	}

	#[test]
	fn first_name_uses_leading_word() {
		let recipient = RecipientMapping {
			store_id: "S1".to_string(),
			manager: "Ana Maria Souza".to_string(),
			email: "ana@example.com".to_string(),
		};
		assert_eq!(recipient.first_name(), "Ana");
		assert!(!recipient.is_board());
	}
}
