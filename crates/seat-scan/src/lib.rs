//! # Seat Scan
//!
//! This crate provides the seat-availability polling for course sections.
//! It loads the tracker configuration, checks each configured section on the
//! registration system, and notifies the operator when a seat opens or when
//! the checks keep failing.

/// Configuration record and loader
mod config;
pub use config::*;

/// Result and error types for scan operations
mod scan_types;
pub use scan_types::*;

/// Availability check of a single course section
mod checker;
pub use checker::*;

/// The polling loop
mod executor;
pub use executor::*;

#[cfg(test)]
mod test_support;
