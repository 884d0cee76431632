//! Dynoload Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the dynoload workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all dynoload
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing initialization
//! - **Types**: Shared domain types (delimiter selection, field
//!   classification)
//!
//! # Example
//!
//! ```no_run
//! use dynoload_common::types::{Delimiter, FieldClassification};
//!
//! let classification = FieldClassification::from_lists("age,score", "active");
//! let delimiter = "tab".parse::<Delimiter>().unwrap_or_default();
//! println!("delimiter byte: {}", delimiter.as_byte());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{LoadError, Result};
