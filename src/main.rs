use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use onepage_reports::config::Config;
use onepage_reports::controller::Controller;
use onepage_reports::services::create_mailer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenvy::dotenv().ok();

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(env_filter)
		.init();

	let config = Config::from_env().context("Failed to load configuration")?;
	let mailer = create_mailer(&config).context("Failed to set up mail transport")?;
	let controller = Controller::new(config, mailer)?;

	match controller.run().await {
		Ok(summary) => {
			tracing::info!(
				store_emails = summary.store_emails_sent,
				skipped = ?summary.stores_skipped,
				board = summary.board_email_sent,
				"Reports delivered"
			);
			Ok(())
		}
		Err(e) => {
			tracing::error!("Report run failed: {}", e);
			Err(e).context("Report run failed")
		}
	}
}
