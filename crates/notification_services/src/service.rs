use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::types::{EmailSettings, NotificationError};

/// Sends notifications to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification with the given subject and plain-text body.
    ///
    /// Delivery failures are logged and never reported back to the caller.
    async fn notify(&self, subject: &str, body: &str);
}

/// Notifier delivering e-mail over an authenticated STARTTLS submission connection.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: EmailSettings,
}

type Mailer = AsyncSmtpTransport<Tokio1Executor>;

impl SmtpNotifier {
    /// Creates a new SMTP notifier.
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    /// Builds the full message for the receiver address.
    pub fn compose_primary(&self, subject: &str, body: &str) -> Result<Message, NotificationError> {
        let message = Message::builder()
            .from(self.sender()?)
            .to(self.settings.receiver_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        Ok(message)
    }

    /// Builds the SMS copy, or `None` when no gateway is configured.
    ///
    /// Gateways usually render only the body of a message, so the copy
    /// carries the subject text as its body.
    pub fn compose_sms(&self, subject: &str) -> Option<Result<Message, NotificationError>> {
        let target = self.settings.sms_target()?;

        Some(self.build_sms(target, subject))
    }

    fn build_sms(&self, target: &str, subject: &str) -> Result<Message, NotificationError> {
        let message = Message::builder()
            .from(self.sender()?)
            .to(target.parse()?)
            .header(ContentType::TEXT_PLAIN)
            .body(subject.to_string())?;

        Ok(message)
    }

    fn sender(&self) -> Result<Mailbox, NotificationError> {
        Ok(self.settings.sender_email.parse()?)
    }

    /// Opens the transport shared by the messages of one notification.
    ///
    /// The transport only lives for a single `notify` call and is dropped on every exit path.
    fn mailer(&self) -> Result<Mailer, NotificationError> {
        let credentials = Credentials::new(
            self.settings.sender_email.clone(),
            self.settings.sender_password.clone(),
        );

        let mailer = Mailer::starttls_relay(&self.settings.smtp_server)?
            .port(self.settings.smtp_port)
            .credentials(credentials)
            .build();

        Ok(mailer)
    }

    async fn send_primary(
        &self,
        mailer: &Mailer,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let message = self.compose_primary(subject, body)?;
        mailer.send(message).await?;
        info!("Email sent successfully to {}", self.settings.receiver_email);
        Ok(())
    }

    async fn send_sms(&self, mailer: &Mailer, subject: &str) -> Result<(), NotificationError> {
        let Some(message) = self.compose_sms(subject) else {
            return Ok(());
        };
        mailer.send(message?).await?;
        info!(
            "SMS notification sent successfully to {}",
            self.settings.sms_target().unwrap_or_default()
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, subject: &str, body: &str) {
        info!(
            "Preparing to send notification to {}",
            self.settings.receiver_email
        );

        let mailer = match self.mailer() {
            Ok(mailer) => mailer,
            Err(e) => {
                error!("Failed to open SMTP transport: {}", e);
                return;
            }
        };

        if let Err(e) = self.send_primary(&mailer, subject, body).await {
            error!("Failed to send email notification: {}", e);
        }

        // SMS failures must not affect the primary e-mail
        if let Some(target) = self.settings.sms_target() {
            info!("SMS gateway configured, sending SMS to {}", target);
            if let Err(e) = self.send_sms(&mailer, subject).await {
                error!("Failed to send SMS notification to {}: {}", target, e);
            }
        }
    }
}
