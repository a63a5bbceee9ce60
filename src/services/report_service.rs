use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

use crate::config::Config;
use crate::models::{KpiTargets, Ranking, RecipientMapping, Store, StoreKpiRow, StoreKpiSummary};

const PASS_COLOR: &str = "green";
const FAIL_COLOR: &str = "red";
const MARKER: &str = "\u{25D9}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
	Currency,
	Integer,
}

/// One line of a KPI table: a measured value against its target
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
	pub name: &'static str,
	pub value: f64,
	pub target: f64,
	pub kind: IndicatorKind,
}

impl Indicator {
	/// Reaching the target exactly counts as a pass.
	pub fn passed(&self) -> bool {
		self.value >= self.target
	}

	pub fn marker_color(&self) -> &'static str {
		if self.passed() { PASS_COLOR } else { FAIL_COLOR }
	}
}

/// Subject and HTML body of a report email
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
	pub subject: String,
	pub html_body: String,
}

/// The three indicators of a store for one window, paired with their targets.
pub fn indicators(row: &StoreKpiRow, targets: &KpiTargets) -> Vec<Indicator> {
	vec![
		Indicator {
			name: "Revenue",
			value: row.revenue,
			target: targets.revenue,
			kind: IndicatorKind::Currency,
		},
		Indicator {
			name: "Distinct Products",
			value: row.distinct_products as f64,
			target: targets.distinct_products,
			kind: IndicatorKind::Integer,
		},
		Indicator {
			name: "Avg Ticket",
			value: row.avg_ticket,
			target: targets.avg_ticket,
			kind: IndicatorKind::Currency,
		},
	]
}

/// `$` followed by the amount with thousands separators and two decimals.
///
/// Rounds the binary value directly, so 2.675 (stored just below the half
/// cent) renders as `$2.67`. Non-finite values render as `$nan` / `$inf`.
pub fn format_currency(value: f64) -> String {
	if value.is_nan() {
		return "$nan".to_string();
	}
	if value.is_infinite() {
		return if value < 0.0 { "$-inf" } else { "$inf" }.to_string();
	}

	let fixed = format!("{:.2}", value.abs());
	let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
	let whole = match whole.parse::<u64>() {
		Ok(units) => units.to_formatted_string(&Locale::en),
		Err(_) => whole.to_string(),
	};
	let sign = if value.is_sign_negative() { "-" } else { "" };
	format!("${}{}.{}", sign, whole, fraction)
}

pub fn format_value(value: f64, kind: IndicatorKind) -> String {
	match kind {
		IndicatorKind::Currency => format_currency(value),
		// truncates, never rounds
		IndicatorKind::Integer => (value.trunc() as i64).to_string(),
	}
}

/// Renders a titled KPI table with a pass/fail marker per indicator.
pub fn render_kpi_table(indicators: &[Indicator], title: &str, is_yearly: bool) -> String {
	let mut table = format!(
		r#"
    <div style='text-align: center; margin-bottom: 10px; font-size: 16pt'>
        <b>{}</b>
    <table border='1' cellpadding='10' cellspacing='0' style='border-collapse: collapse; text-align: center; font-size: 14pt; margin: 20px 0; background-color: #f9f9f9; width: 100%; font-family: Calibri, sans-serif;'>
        <thead>
            <tr>
                <th>Indicator</th>
                <th>{}</th>
                <th>Target</th>
                <th>Scenario</th>
            </tr>
        </thead>
        <tbody>
"#,
		escape_html(title),
		if is_yearly { "Year Value" } else { "Day Value" }
	);

	for indicator in indicators {
		table.push_str(&format!(
			r#"
            <tr>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td style="color: {}; font-size: 18pt;">{}</td>
            </tr>
"#,
			indicator.name,
			format_value(indicator.value, indicator.kind),
			format_value(indicator.target, indicator.kind),
			indicator.marker_color(),
			MARKER
		));
	}

	table.push_str(
		r#"
        </tbody>
    </table>
    </div>
"#,
	);
	table
}

/// Escapes text interpolated into HTML bodies.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Builds the store manager and board emails.
pub struct ReportService {
	config: Arc<Config>,
}

impl ReportService {
	pub fn new(config: Arc<Config>) -> Self {
		Self { config }
	}

	pub fn store_report(
		&self,
		recipient: &RecipientMapping,
		store: &Store,
		summary: &StoreKpiSummary,
		yesterday: NaiveDate,
	) -> RenderedReport {
		let daily_table = render_kpi_table(
			&indicators(&summary.daily, &self.config.daily_targets),
			"Daily Values",
			false,
		);
		let yearly_table = render_kpi_table(
			&indicators(&summary.yearly, &self.config.yearly_targets),
			"Yearly Values",
			true,
		);
		let store_name = escape_html(&store.store_name);

		let html_body = format!(
			r#"
        <style>
            body, table, p, td {{
                font-family: Calibri, sans-serif;
            }}
        </style>
        <p>Good Morning, {manager}</p>
        <p>Yesterday's result ({short_date}) of {store_name} was:</p>
        <table style='width: 100%; border-collapse: collapse;'>
            <tr>
                <td style='width: 50%; vertical-align: top; padding: 10px;'>
                    {daily_table}
                </td>
                <td style='width: 50%; vertical-align: top; padding: 10px;'>
                    {yearly_table}
                </td>
            </tr>
        </table>
        <p>Please find attached the spreadsheet with all the data for further details.</p>
        <p>Should you have any questions, feel free to reach out.</p>
        <br>
        <p>Best Regards,</p>
        <p>{signature}</p>
"#,
			manager = escape_html(recipient.first_name()),
			short_date = yesterday.format("%m/%d"),
			store_name = store_name,
			daily_table = daily_table,
			yearly_table = yearly_table,
			signature = escape_html(&self.config.signature),
		);

		RenderedReport {
			subject: format!("OnePage {} - {}", yesterday.format("%Y/%m/%d"), store.store_name),
			html_body,
		}
	}

	pub fn board_report(&self, daily: &Ranking, yearly: &Ranking, yesterday: NaiveDate) -> RenderedReport {
		let html_body = format!(
			r#"
        <style>
            body, table, p, td, li {{
                font-family: Calibri, sans-serif;
            }}
        </style>
        <p>Dear Board,</p>

        <p>We are pleased to share the revenue performance rankings for our stores:</p>

        <p><b>Daily Performance (Date: {short_date}):</b></p>
        {daily_extremes}

        <p><b>YTD Performance (Year: {year}):</b></p>
        {yearly_extremes}

        <p>The detailed daily and yearly rankings are attached for your review.</p>

        <p>Should you have any questions, feel free to reach out.</p>

        <p>Best regards,</p>
        <p>{signature}</p>
"#,
			short_date = yesterday.format("%m/%d"),
			daily_extremes = render_extremes(daily),
			year = yesterday.year(),
			yearly_extremes = render_extremes(yearly),
			signature = escape_html(&self.config.signature),
		);

		RenderedReport {
			subject: format!(
				"Daily and YTD Store Revenue Rankings - {}",
				yesterday.format("%Y/%m/%d")
			),
			html_body,
		}
	}
}

fn render_extremes(ranking: &Ranking) -> String {
	format!(
		r#"<ul>
            <li><span style='color: {pass};'>Best Store:</span> <b>{best}</b> with a revenue of <b>{best_revenue}</b>.</li>
            <li><span style='color: {fail};'>Worst Store:</span> <b>{worst}</b> with a revenue of <b>{worst_revenue}</b>.</li>
        </ul>"#,
		pass = PASS_COLOR,
		fail = FAIL_COLOR,
		best = escape_html(&ranking.best.store_name),
		best_revenue = format_currency(ranking.best.revenue),
		worst = escape_html(&ranking.worst.store_name),
		worst_revenue = format_currency(ranking.worst.revenue),
	)
}
