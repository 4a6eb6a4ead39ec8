use std::{collections::HashSet, path::PathBuf};

use fintrack_domain::EntryBook;

use crate::CoreError;

/// A persisted snapshot of one user's entry book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub user: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over backends able to keep per-user entry books and their backups.
pub trait EntryStorage: Send + Sync {
    fn load_book(&self, user: &str) -> Result<EntryBook, CoreError>;
    fn save_book(&self, user: &str, book: &EntryBook) -> Result<(), CoreError>;
    fn list_users(&self) -> Result<Vec<String>, CoreError>;
    fn delete_book(&self, user: &str) -> Result<(), CoreError>;
    fn backup_book(
        &self,
        user: &str,
        book: &EntryBook,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError>;
    fn list_backups(&self, user: &str) -> Result<Vec<BackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BackupInfo) -> Result<EntryBook, CoreError>;
}

/// Reports anomalies in a loaded book that the aggregator would silently accept.
pub fn book_warnings(book: &EntryBook) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for entry in &book.entries {
        if !seen.insert(entry.id) {
            warnings.push(format!("entry {} appears more than once", entry.id));
        }
        if !entry.income.is_finite() || entry.income < 0.0 {
            warnings.push(format!("entry {} has invalid income {}", entry.id, entry.income));
        }
        if !entry.expense.is_finite() || entry.expense < 0.0 {
            warnings.push(format!(
                "entry {} has invalid expense {}",
                entry.id, entry.expense
            ));
        }
    }
    warnings
}
