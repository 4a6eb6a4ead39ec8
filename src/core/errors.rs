use std::{io, result::Result as StdResult};

use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Unified error type for the book manager and its collaborators.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No entry book is open. Use `user open <name>` first.")]
    BookNotOpen,
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, AppError>;

/// Errors that end the shell session.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::App(AppError::Io(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(AppError::Config(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(AppError::Core(err))
    }
}
