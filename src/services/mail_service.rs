use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lettre::message::{Attachment, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{Config, SmtpSettings};
use crate::error::{AppError, Result};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Simulated recipient addresses in the source data: `email+<tag>@address.com`.
static SIMULATED_ADDRESS: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"email\+(.*?)@address\.com").expect("valid simulated address pattern"));

/// An email ready to hand to a [`Mailer`]
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
	pub from: String,
	pub to: String,
	pub subject: String,
	pub html_body: String,
	pub attachments: Vec<PathBuf>,
}

/// Send capability used by the report run.
#[async_trait]
pub trait Mailer: Send + Sync {
	async fn send(&self, email: OutgoingEmail) -> Result<()>;

	/// Returns a stable name for logging.
	fn name(&self) -> &str;
}

pub type DynMailer = Arc<dyn Mailer>;

/// Chooses the preview or SMTP mailer from the configuration.
pub fn create_mailer(config: &Config) -> Result<DynMailer> {
	if config.mail_preview {
		Ok(Arc::new(PreviewMailer::new(config.output_dir.join("outbox"))))
	} else {
		Ok(Arc::new(SmtpMailer::new(&config.smtp)?))
	}
}

/// Builds the MIME message: the HTML body plus every attachment that exists.
///
/// Attachment paths that do not point at a file are skipped with a warning.
pub fn build_message(email: &OutgoingEmail) -> Result<Message> {
	let content_type = ContentType::parse(XLSX_CONTENT_TYPE)
		.map_err(|e| AppError::Mail(format!("Invalid attachment content type: {}", e)))?;

	let mut body = MultiPart::mixed().singlepart(SinglePart::html(email.html_body.clone()));
	for path in &email.attachments {
		if !path.is_file() {
			tracing::warn!("Attachment not found, skipping: {}", path.display());
			continue;
		}
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| "attachment.xlsx".to_string());
		body = body.singlepart(Attachment::new(file_name).body(fs::read(path)?, content_type.clone()));
	}

	Message::builder()
		.from(
			email
				.from
				.parse()
				.map_err(|e| AppError::Mail(format!("Invalid from address: {}", e)))?,
		)
		.to(email
			.to
			.parse()
			.map_err(|e| AppError::Mail(format!("Invalid to address '{}': {}", email.to, e)))?)
		.subject(email.subject.clone())
		.multipart(body)
		.map_err(|e| AppError::Mail(format!("Failed to build email: {}", e)))
}

/// Delivers through an SMTP server.
pub struct SmtpMailer {
	transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
	pub fn new(smtp: &SmtpSettings) -> Result<Self> {
		let builder = match (&smtp.username, &smtp.password) {
			(Some(username), Some(password)) => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
				.map_err(|e| AppError::Mail(format!("Failed to create SMTP transport: {}", e)))?
				.credentials(Credentials::new(username.clone(), password.clone())),
			_ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host),
		};
		let builder = match smtp.port {
			Some(port) => builder.port(port),
			None => builder,
		};

		Ok(Self {
			transport: builder.build(),
		})
	}
}

#[async_trait]
impl Mailer for SmtpMailer {
	async fn send(&self, email: OutgoingEmail) -> Result<()> {
		let message = build_message(&email)?;
		self.transport
			.send(message)
			.await
			.map_err(|e| AppError::Mail(format!("Failed to send email via SMTP: {}", e)))?;

		tracing::info!("Email sent to {} with subject: {}", email.to, email.subject);
		Ok(())
	}

	fn name(&self) -> &str {
		"smtp"
	}
}

/// Writes each message as an `.eml` file for review instead of sending it.
pub struct PreviewMailer {
	outbox_dir: PathBuf,
	counter: AtomicUsize,
}

impl PreviewMailer {
	pub fn new(outbox_dir: impl Into<PathBuf>) -> Self {
		Self {
			outbox_dir: outbox_dir.into(),
			counter: AtomicUsize::new(0),
		}
	}
}

#[async_trait]
impl Mailer for PreviewMailer {
	async fn send(&self, email: OutgoingEmail) -> Result<()> {
		let message = build_message(&email)?;
		fs::create_dir_all(&self.outbox_dir)?;

		let index = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
		let recipient: String = email
			.to
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '@' { c } else { '_' })
			.collect();
		let path = self.outbox_dir.join(format!("{:03}_{}.eml", index, recipient));
		fs::write(&path, message.formatted())?;

		tracing::info!("Email to {} previewed at {}", email.to, path.display());
		Ok(())
	}

	fn name(&self) -> &str {
		"preview"
	}
}

/// Redirects simulated recipient addresses to one real mailbox, keeping the tag.
///
/// `email+store1@address.com` with override `me@example.com` becomes
/// `me+store1@example.com`. Other addresses are returned unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipientOverride {
	local_part: String,
	domain: String,
}

impl RecipientOverride {
	pub fn new(override_address: &str) -> Result<Self> {
		match override_address.trim().split_once('@') {
			Some((local_part, domain)) if !local_part.is_empty() && !domain.is_empty() => Ok(Self {
				local_part: local_part.to_string(),
				domain: domain.to_string(),
			}),
			_ => Err(AppError::Mail(format!(
				"Invalid override address '{}'",
				override_address
			))),
		}
	}

	pub fn apply(&self, address: &str) -> String {
		SIMULATED_ADDRESS
			.replace_all(address, |caps: &regex::Captures| {
				format!("{}+{}@{}", self.local_part, &caps[1], self.domain)
			})
			.into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use uuid::Uuid;

	fn email_with(attachments: Vec<PathBuf>) -> OutgoingEmail {
		OutgoingEmail {
			from: "reports@example.com".to_string(),
			to: "manager@example.com".to_string(),
			subject: "OnePage 2024/05/10 - Downtown".to_string(),
			html_body: "<p>Hello</p>".to_string(),
			attachments,
		}
	}

	#[test]
	fn override_keeps_routing_tag() {
		let redirect = RecipientOverride::new("me@example.com").unwrap();
		assert_eq!(redirect.apply("email+store1@address.com"), "me+store1@example.com");
		assert_eq!(redirect.apply("email+board@address.com"), "me+board@example.com");
		assert_eq!(redirect.apply("someone@elsewhere.org"), "someone@elsewhere.org");
	}

	#[test]
	fn override_requires_full_address() {
		assert!(RecipientOverride::new("not-an-address").is_err());
		assert!(RecipientOverride::new("@example.com").is_err());
	}

	#[test]
	fn missing_attachment_is_skipped() {
		let dir = std::env::temp_dir().join(format!("onepage_mail_{}", Uuid::new_v4()));
		fs::create_dir_all(&dir).unwrap();
		let present = dir.join("present_sales.xlsx");
		fs::write(&present, b"spreadsheet bytes").unwrap();
		let missing = dir.join("missing_sales.xlsx");

		let message = build_message(&email_with(vec![present, missing])).unwrap();
		let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();

		assert!(formatted.contains("present_sales.xlsx"));
		assert!(!formatted.contains("missing_sales.xlsx"));

		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn invalid_recipient_is_an_error() {
		let mut email = email_with(vec![]);
		email.to = "not an address".to_string();
		assert!(matches!(build_message(&email), Err(AppError::Mail(_))));
	}

	#[tokio::test]
	async fn preview_writes_eml_files() {
		let dir = std::env::temp_dir().join(format!("onepage_outbox_{}", Uuid::new_v4()));
		let mailer = PreviewMailer::new(dir.clone());

		mailer.send(email_with(vec![])).await.unwrap();
		mailer.send(email_with(vec![])).await.unwrap();

		let mut files: Vec<String> = fs::read_dir(&dir)
			.unwrap()
			.map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
			.collect();
		files.sort();
		assert_eq!(files, vec!["001_manager@example.com.eml", "002_manager@example.com.eml"]);

		let content = fs::read_to_string(dir.join(&files[0])).unwrap();
		assert!(content.contains("Subject: OnePage 2024/05/10 - Downtown"));

		fs::remove_dir_all(&dir).unwrap();
	}
}
