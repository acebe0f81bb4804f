//! # Notification Services
//!
//! This crate provides e-mail notifications for the seat tracker.
//! It includes the SMTP notifier, the optional SMS-gateway copy of each notification,
//! and the settings needed to reach the mail server.

/// Notifier trait and the SMTP implementation.
pub mod service;
/// Settings and error types used by the notification services.
pub mod types;

pub use service::{Notifier, SmtpNotifier};
pub use types::{EmailSettings, NotificationError};
