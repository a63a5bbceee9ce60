use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::data_sources::{CoreDataSource, ReportInputs};
use crate::error::{AppError, Result};
use crate::models::{PeriodWindow, Store};
use crate::services::export_service::store_sales_rows;
use crate::services::kpi_service::filter_period;
use crate::services::{
	DynMailer, ExportService, KpiReport, KpiService, OutgoingEmail, RecipientOverride, ReportService,
	rank_stores,
};

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
	pub yesterday: Option<NaiveDate>,
	pub store_emails_sent: usize,
	pub stores_skipped: Vec<String>,
	pub daily_ranking_path: Option<PathBuf>,
	pub yearly_ranking_path: Option<PathBuf>,
	pub board_email_sent: bool,
}

pub struct Controller {
	config: Arc<Config>,
	data_source: Arc<CoreDataSource>,
	report_service: Arc<ReportService>,
	export_service: Arc<ExportService>,
	mailer: DynMailer,
	recipient_override: Option<RecipientOverride>,
}

impl Controller {
	pub fn new(config: Config, mailer: DynMailer) -> Result<Self> {
		let config = Arc::new(config);
		let data_source = Arc::new(CoreDataSource::new(config.data_sources_dir.clone()));
		let report_service = Arc::new(ReportService::new(config.clone()));
		let export_service = Arc::new(ExportService::new(config.output_dir.clone()));
		let recipient_override = match &config.email_to_override {
			Some(address) => Some(RecipientOverride::new(address)?),
			None => None,
		};

		Ok(Self {
			config,
			data_source,
			report_service,
			export_service,
			mailer,
			recipient_override,
		})
	}

	/// Loads the inputs, then runs the store pass followed by the board pass.
	pub async fn run(&self) -> Result<RunSummary> {
		let run_id = Uuid::new_v4();
		let span = tracing::info_span!("report_run", %run_id);

		async move {
			let yesterday = self.config.yesterday();
			tracing::info!(%yesterday, mailer = self.mailer.name(), "Report run started");

			let inputs = ReportInputs::load(self.data_source.clone())?;
			let report = KpiService::new(&inputs.products, &inputs.stores).compute(&inputs.sales, yesterday);

			let mut summary = RunSummary {
				yesterday: Some(yesterday),
				..RunSummary::default()
			};
			self.send_store_reports(&inputs, &report, yesterday, &mut summary)
				.await?;
			self.send_board_report(&inputs, &report, yesterday, &mut summary)
				.await?;

			tracing::info!(
				store_emails = summary.store_emails_sent,
				skipped = summary.stores_skipped.len(),
				"Report run finished"
			);
			Ok(summary)
		}
		.instrument(span)
		.await
	}

	async fn send_store_reports(
		&self,
		inputs: &ReportInputs,
		report: &KpiReport,
		yesterday: NaiveDate,
		summary: &mut RunSummary,
	) -> Result<()> {
		let stores: HashMap<&str, &Store> = inputs
			.stores
			.iter()
			.map(|store| (store.store_id.as_str(), store))
			.collect();
		let yearly_lines = filter_period(&inputs.sales, PeriodWindow::YearToDate, yesterday);

		for recipient in inputs.recipients.iter().filter(|r| !r.is_board()) {
			let Some(store) = stores.get(recipient.store_id.as_str()) else {
				tracing::warn!(store_id = %recipient.store_id, "Store not in stores table, skipping");
				summary.stores_skipped.push(recipient.store_id.clone());
				continue;
			};
			let Some(kpis) = report.summary_for(&recipient.store_id) else {
				tracing::warn!(
					store_id = %recipient.store_id,
					store = %store.store_name,
					"No daily and yearly sales for store, skipping"
				);
				summary.stores_skipped.push(recipient.store_id.clone());
				continue;
			};

			let rendered = self
				.report_service
				.store_report(recipient, store, kpis, yesterday);
			let rows = store_sales_rows(&yearly_lines, store, &inputs.products);
			let attachment = self.export_service.write_store_sales(store, &rows)?;

			self.mailer
				.send(OutgoingEmail {
					from: self.config.email_from.clone(),
					to: self.recipient_address(&recipient.email),
					subject: rendered.subject,
					html_body: rendered.html_body,
					attachments: vec![attachment],
				})
				.await?;
			summary.store_emails_sent += 1;

			if !self.config.send_delay.is_zero() {
				tokio::time::sleep(self.config.send_delay).await;
			}
		}

		Ok(())
	}

	async fn send_board_report(
		&self,
		inputs: &ReportInputs,
		report: &KpiReport,
		yesterday: NaiveDate,
		summary: &mut RunSummary,
	) -> Result<()> {
		let daily = rank_stores(
			PeriodWindow::Daily,
			report.for_window(PeriodWindow::Daily),
			&inputs.stores,
		)?;
		let yearly = rank_stores(
			PeriodWindow::YearToDate,
			report.for_window(PeriodWindow::YearToDate),
			&inputs.stores,
		)?;

		let daily_path = self.export_service.write_ranking(&daily, yesterday)?;
		let yearly_path = self.export_service.write_ranking(&yearly, yesterday)?;
		summary.daily_ranking_path = Some(daily_path.clone());
		summary.yearly_ranking_path = Some(yearly_path.clone());

		let board = inputs
			.recipients
			.iter()
			.find(|r| r.is_board())
			.ok_or(AppError::MissingBoardRecipient)?;
		let rendered = self.report_service.board_report(&daily, &yearly, yesterday);

		self.mailer
			.send(OutgoingEmail {
				from: self.config.email_from.clone(),
				to: self.recipient_address(&board.email),
				subject: rendered.subject,
				html_body: rendered.html_body,
				attachments: vec![daily_path, yearly_path],
			})
			.await?;
		summary.board_email_sent = true;

		Ok(())
	}

	fn recipient_address(&self, address: &str) -> String {
		match &self.recipient_override {
			Some(redirect) => redirect.apply(address),
			None => address.to_string(),
		}
	}
}
