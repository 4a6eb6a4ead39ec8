pub mod book_manager;
pub mod errors;

pub use book_manager::{BookManager, OpenReport};
pub use errors::{AppError, CliError, Result};
