//! fintrack-domain
//!
//! Pure domain models (LedgerEntry, Category, EntryBook, derived views).
//! No I/O, no CLI, no storage. Only data types, enums and the ingestion boundary.

pub mod book;
pub mod category;
pub mod common;
pub mod entry;
pub mod raw;
pub mod view;

pub use book::*;
pub use category::*;
pub use common::*;
pub use entry::*;
pub use raw::*;
pub use view::*;
