use std::sync::Arc;

use sqlx::PgPool;

use bursar_config::{BillingConfig, CorsConfig, EmailConfig};
use bursar_db::init_db_pool;

use crate::modules::directory::pg::{PgClassCatalog, PgParentDirectory, PgStudentDirectory};
use crate::modules::directory::{ClassCatalog, ParentDirectory, StudentDirectory};
use crate::modules::enrollments::store::{EnrollmentStore, PgEnrollmentStore};
use crate::modules::invoice_generation::log::{GenerationLogStore, PgGenerationLogStore};
use crate::modules::invoices::store::{InvoiceStore, PgInvoiceStore};
use crate::modules::notifications::NotificationDispatcher;
use crate::modules::notifications::email::EmailNotifier;
use crate::modules::payments::{PaymentProcessor, PgPaymentProcessor};
use crate::modules::reminders::log::{PgReminderLogStore, ReminderLogStore};

/// Shared application state: the pool, env configs, and the trait objects
/// the billing engine is written against. Tests assemble the same shape
/// from in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub billing_config: BillingConfig,
    pub enrollments: Arc<dyn EnrollmentStore>,
    pub invoices: Arc<dyn InvoiceStore>,
    pub generation_logs: Arc<dyn GenerationLogStore>,
    pub reminder_logs: Arc<dyn ReminderLogStore>,
    pub students: Arc<dyn StudentDirectory>,
    pub classes: Arc<dyn ClassCatalog>,
    pub parents: Arc<dyn ParentDirectory>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub payments: Arc<dyn PaymentProcessor>,
}

pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;
    let email_config = EmailConfig::from_env();

    AppState {
        enrollments: Arc::new(PgEnrollmentStore::new(db.clone())),
        invoices: Arc::new(PgInvoiceStore::new(db.clone())),
        generation_logs: Arc::new(PgGenerationLogStore::new(db.clone())),
        reminder_logs: Arc::new(PgReminderLogStore::new(db.clone())),
        students: Arc::new(PgStudentDirectory::new(db.clone())),
        classes: Arc::new(PgClassCatalog::new(db.clone())),
        parents: Arc::new(PgParentDirectory::new(db.clone())),
        notifier: Arc::new(EmailNotifier::new(email_config.clone())),
        payments: Arc::new(PgPaymentProcessor::new(db.clone())),
        db,
        email_config,
        cors_config: CorsConfig::from_env(),
        billing_config: BillingConfig::from_env(),
    }
}
