use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};

use crate::models::KpiTargets;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
	pub host: String,
	pub port: Option<u16>,
	pub username: Option<String>,
	pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
	pub email_from: String,
	/// Redirects simulated recipient addresses when set. Test environments only.
	pub email_to_override: Option<String>,
	pub data_sources_dir: PathBuf,
	pub output_dir: PathBuf,
	pub report_date: Option<NaiveDate>,
	pub send_delay: Duration,
	pub mail_preview: bool,
	pub smtp: SmtpSettings,
	pub signature: String,
	pub daily_targets: KpiTargets,
	pub yearly_targets: KpiTargets,
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let email_from = lookup("EMAIL_FROM")
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingSender)?;

		let report_date = match lookup("REPORT_DATE") {
			Some(value) => Some(
				NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
					.map_err(|_| ConfigError::invalid("REPORT_DATE", &value))?,
			),
			None => None,
		};

		let daily_defaults = KpiTargets::daily_defaults();
		let yearly_defaults = KpiTargets::yearly_defaults();

		Ok(Self {
			email_from,
			email_to_override: lookup("EMAIL_TO").filter(|value| !value.trim().is_empty()),
			data_sources_dir: lookup("DATA_SOURCES_DIR")
				.unwrap_or_else(|| "data_sources".to_string())
				.into(),
			output_dir: lookup("OUTPUT_DIR")
				.unwrap_or_else(|| "store_backup_files".to_string())
				.into(),
			report_date,
			send_delay: Duration::from_secs(parse_or(&lookup, "SEND_DELAY_SECS", 2)?),
			mail_preview: parse_bool(&lookup, "MAIL_PREVIEW")?,
			smtp: SmtpSettings {
				host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
				port: match lookup("SMTP_PORT") {
					Some(value) => Some(
						value
							.trim()
							.parse()
							.map_err(|_| ConfigError::invalid("SMTP_PORT", &value))?,
					),
					None => None,
				},
				username: lookup("SMTP_USER"),
				password: lookup("SMTP_PASS"),
			},
			signature: lookup("REPORT_SIGNATURE").unwrap_or_else(|| "Store Operations".to_string()),
			daily_targets: KpiTargets {
				revenue: parse_or(&lookup, "DAILY_REVENUE_TARGET", daily_defaults.revenue)?,
				distinct_products: parse_or(
					&lookup,
					"DAILY_DISTINCT_PRODUCTS_TARGET",
					daily_defaults.distinct_products,
				)?,
				avg_ticket: parse_or(&lookup, "DAILY_AVG_TICKET_TARGET", daily_defaults.avg_ticket)?,
			},
			yearly_targets: KpiTargets {
				revenue: parse_or(&lookup, "YEARLY_REVENUE_TARGET", yearly_defaults.revenue)?,
				distinct_products: parse_or(
					&lookup,
					"YEARLY_DISTINCT_PRODUCTS_TARGET",
					yearly_defaults.distinct_products,
				)?,
				avg_ticket: parse_or(&lookup, "YEARLY_AVG_TICKET_TARGET", yearly_defaults.avg_ticket)?,
			},
		})
	}

	/// The day being reported on: the day before the run date.
	pub fn yesterday(&self) -> NaiveDate {
		let today = self.report_date.unwrap_or_else(|| Local::now().date_naive());
		today - Days::new(1)
	}
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
{
	match lookup(key) {
		Some(value) => value
			.trim()
			.parse()
			.map_err(|_| ConfigError::invalid(key, &value)),
		None => Ok(default),
	}
}

fn parse_bool<F>(lookup: &F, key: &str) -> Result<bool, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	match lookup(key) {
		Some(value) => match value.trim().to_lowercase().as_str() {
			"true" | "1" | "yes" | "y" => Ok(true),
			"false" | "0" | "no" | "n" | "" => Ok(false),
			_ => Err(ConfigError::invalid(key, &value)),
		},
		None => Ok(false),
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("EMAIL_FROM environment variable is not set")]
	MissingSender,
	#[error("Invalid value '{value}' for {key}")]
	InvalidValue { key: String, value: String },
}

impl ConfigError {
	fn invalid(key: &str, value: &str) -> Self {
		Self::InvalidValue {
			key: key.to_string(),
			value: value.to_string(),
		}
	}
}
