//! Shared types, errors, and configuration for Ledgerbook.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes and decimal precision policy
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
