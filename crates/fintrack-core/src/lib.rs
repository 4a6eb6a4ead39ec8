//! fintrack-core
//!
//! Aggregation, reporting and entry rules for fintrack.
//! Depends on fintrack-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod aggregator;
pub mod charts;
pub mod csv_format;
pub mod entry_service;
pub mod error;
pub mod format;
pub mod report_service;
pub mod storage;
pub mod time;

pub use aggregator::*;
pub use charts::*;
pub use entry_service::*;
pub use error::CoreError;
pub use format::*;
pub use report_service::*;
pub use storage::*;
pub use time::*;
