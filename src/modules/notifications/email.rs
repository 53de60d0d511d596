use async_trait::async_trait;
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

use bursar_config::EmailConfig;

use super::{
    CheckoutNotice, EnrollmentNotice, InvoiceNotice, NotificationDispatcher, ReminderNotice,
};

/// SMTP-backed dispatcher. When `SMTP_ENABLED` is off every send becomes a
/// debug-logged no-op, which keeps local development quiet without stubbing
/// the trait.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, body))]
    async fn send_email(&self, to_email: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if !self.config.enabled {
            debug!(to_email, subject, "smtp disabled, skipping notification");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email)).await??;

        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for EmailNotifier {
    async fn enrollment_created(&self, notice: &EnrollmentNotice) -> anyhow::Result<()> {
        let body = format!(
            "Hi {},\n\n\
             You have been enrolled in {}. You will receive an invoice shortly.\n\n\
             Best regards,\n\
             {}",
            notice.student_name, notice.class_name, self.config.from_name
        );
        self.send_email(&notice.recipient, "Enrollment confirmation", &body)
            .await
    }

    async fn invoice_generated(&self, notice: &InvoiceNotice) -> anyhow::Result<()> {
        let body = format!(
            "Hi {},\n\n\
             Invoice {} has been issued: {} {} for {}.\n\
             Payment is due by {}.\n\n\
             Best regards,\n\
             {}",
            notice.student_name,
            notice.invoice_number,
            notice.amount,
            notice.currency.as_str(),
            notice.description,
            notice.due_date,
            self.config.from_name
        );
        self.send_email(
            &notice.recipient,
            &format!("Invoice {}", notice.invoice_number),
            &body,
        )
        .await
    }

    async fn payment_confirmed(&self, notice: &InvoiceNotice) -> anyhow::Result<()> {
        let body = format!(
            "Hi {},\n\n\
             We received your payment of {} {} for invoice {}. Thank you!\n\n\
             Best regards,\n\
             {}",
            notice.student_name,
            notice.amount,
            notice.currency.as_str(),
            notice.invoice_number,
            self.config.from_name
        );
        self.send_email(&notice.recipient, "Payment received", &body)
            .await
    }

    async fn guest_checkout(&self, notice: &CheckoutNotice) -> anyhow::Result<()> {
        let body = format!(
            "Hi {},\n\n\
             Your checkout is complete. Invoices issued: {}.\n\
             Total due: {} {}.\n\n\
             Best regards,\n\
             {}",
            notice.student_name,
            notice.invoice_numbers.join(", "),
            notice.total,
            notice.currency.as_str(),
            self.config.from_name
        );
        self.send_email(&notice.recipient, "Checkout confirmation", &body)
            .await
    }

    async fn fee_reminder(&self, notice: &ReminderNotice) -> anyhow::Result<()> {
        let subject = if notice.overdue {
            format!("Overdue invoice {}", notice.invoice_number)
        } else {
            format!("Upcoming payment for invoice {}", notice.invoice_number)
        };
        self.send_email(&notice.recipient, &subject, &notice.message)
            .await
    }
}
