use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Mail server, credentials and recipients for notifications.
#[derive(Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_sms_gateway"))]
pub struct EmailSettings {
    /// Sender address, also used as the SMTP login
    #[validate(email(message = "sender_email must be an e-mail address"))]
    pub sender_email: String,

    /// Address receiving the full notification
    #[validate(email(message = "receiver_email must be an e-mail address"))]
    pub receiver_email: String,

    /// Carrier gateway address turning an e-mail into a text message.
    /// Blank means no SMS copy is sent.
    #[serde(default)]
    pub sms_gateway_email: Option<String>,

    /// SMTP host, e.g. `smtp.gmail.com`
    #[validate(length(min = 1, message = "smtp_server is required"))]
    pub smtp_server: String,

    /// SMTP submission port, typically 587
    #[validate(range(min = 1, message = "smtp_port must be a valid port"))]
    pub smtp_port: u16,

    /// Password or app password of the sender account
    pub sender_password: String,
}

impl EmailSettings {
    /// The SMS gateway address, if one is configured and not blank
    pub fn sms_target(&self) -> Option<&str> {
        self.sms_gateway_email
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

/// A blank gateway is allowed, anything else must be an e-mail address.
fn validate_sms_gateway(settings: &EmailSettings) -> Result<(), ValidationError> {
    match settings.sms_target() {
        Some(target) if !target.validate_email() => Err(ValidationError::new("sms_gateway_email")
            .with_message("sms_gateway_email must be an e-mail address".into())),
        _ => Ok(()),
    }
}

// The password must never end up in logs.
impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("sender_email", &self.sender_email)
            .field("receiver_email", &self.receiver_email)
            .field("sms_gateway_email", &self.sms_gateway_email)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("sender_password", &"<redacted>")
            .finish()
    }
}

/// Errors raised while composing or sending a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// A configured address could not be parsed.
    #[error("Invalid e-mail address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    /// The message could not be built.
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connecting, upgrading, authenticating or sending failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
