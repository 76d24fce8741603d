//! Core types and utilities for dbsheet.
//!
//! This crate provides the pieces shared by the dbsheet binary: the error
//! hierarchy, logging initialization, the transient schema metadata records,
//! and the XLSX workbook writer.
//!
//! # Security
//! Connection errors carry a masked connection URL; the password never
//! appears in any error message or log line.

pub mod error;
pub mod logging;
pub mod models;
pub mod xlsx;

// Re-export commonly used types
pub use error::{DbsheetError, Result};
pub use logging::init_logging;
pub use models::{COLUMN_HEADER, Column, Table};
pub use xlsx::{MAX_SHEET_NAME_LEN, Workbook, Worksheet, truncate_sheet_name};
