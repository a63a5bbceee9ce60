pub mod export_service;
pub mod kpi_service;
pub mod mail_service;
pub mod ranking_service;
pub mod report_service;

pub use export_service::ExportService;
pub use kpi_service::{KpiReport, KpiService};
pub use mail_service::{DynMailer, Mailer, OutgoingEmail, RecipientOverride, create_mailer};
pub use ranking_service::rank_stores;
pub use report_service::{RenderedReport, ReportService};
