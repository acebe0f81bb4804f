//! # Registration API
//!
//! This crate provides a client for a university course-registration search service.
//! A search is a two step exchange: the session is first authorized for a term, then
//! the sections of a course are searched within that term.

/// HTTP session and search client.
mod client;
pub use client::*;

/// Settings, queries, response payloads and errors.
mod types;
pub use types::*;

/// Status codes carried by [`ApiError::Status`].
pub use reqwest::StatusCode;
