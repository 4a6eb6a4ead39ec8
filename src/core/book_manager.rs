use std::sync::Arc;

use fintrack_core::{
    book_warnings,
    storage::{BackupInfo, EntryStorage},
    Clock, CoreError, EntryService, LedgerAggregator,
};
use fintrack_domain::{
    CategoryFilter, DerivedView, EntryBook, EntryDraft, IngestReport, LedgerEntry, RawEntry,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::errors::{AppError, Result};

/// Outcome of opening a user's book.
#[derive(Debug, Clone)]
pub struct OpenReport {
    pub user: String,
    pub created: bool,
    pub entries: usize,
    pub warnings: Vec<String>,
}

/// Owns the active user's book and keeps storage in step with every change.
pub struct BookManager {
    storage: Box<dyn EntryStorage>,
    clock: Arc<dyn Clock>,
    current: Option<EntryBook>,
    current_user: Option<String>,
}

impl BookManager {
    pub fn new(storage: Box<dyn EntryStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            current: None,
            current_user: None,
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn book(&self) -> Result<&EntryBook> {
        self.current.as_ref().ok_or(AppError::BookNotOpen)
    }

    /// Loads the user's book, creating and saving an empty one on first use.
    pub fn open(&mut self, user: &str) -> Result<OpenReport> {
        let user = user.trim();
        if user.is_empty() {
            return Err(AppError::InvalidInput("user name cannot be empty".into()));
        }
        let (book, created) = match self.storage.load_book(user) {
            Ok(book) => (book, false),
            Err(CoreError::BookNotFound(_)) => {
                let mut book = EntryBook::new(user);
                book.created_at = self.clock.now();
                book.updated_at = book.created_at;
                self.storage.save_book(user, &book)?;
                (book, true)
            }
            Err(err) => return Err(err.into()),
        };
        let warnings = book_warnings(&book);
        for warning in &warnings {
            warn!(user, "{warning}");
        }
        info!(user, entries = book.len(), created, "entry book opened");
        let report = OpenReport {
            user: user.to_string(),
            created,
            entries: book.len(),
            warnings,
        };
        self.current = Some(book);
        self.current_user = Some(user.to_string());
        Ok(report)
    }

    pub fn close(&mut self) {
        self.current = None;
        self.current_user = None;
    }

    pub fn add(&mut self, draft: &EntryDraft) -> Result<Uuid> {
        let clock = Arc::clone(&self.clock);
        self.commit(|book| EntryService::add(book, draft, clock.as_ref()))
    }

    pub fn update(&mut self, id: Uuid, draft: &EntryDraft) -> Result<()> {
        let clock = Arc::clone(&self.clock);
        self.commit(|book| EntryService::update(book, id, draft, clock.as_ref()))
    }

    pub fn remove(&mut self, id: Uuid) -> Result<LedgerEntry> {
        self.commit(|book| EntryService::remove(book, id))
    }

    pub fn entry(&self, id: Uuid) -> Result<&LedgerEntry> {
        Ok(EntryService::get(self.book()?, id)?)
    }

    pub fn resolve(&self, token: &str) -> Result<Uuid> {
        Ok(EntryService::resolve(self.book()?, token)?)
    }

    /// Newest-first listing used by `entry list`.
    pub fn recent(&self) -> Result<Vec<&LedgerEntry>> {
        Ok(EntryService::list_recent(self.book()?))
    }

    pub fn import(&mut self, raws: Vec<RawEntry>) -> Result<IngestReport> {
        let clock = Arc::clone(&self.clock);
        let report = self.commit(|book| Ok(EntryService::import(book, raws, clock.as_ref())))?;
        info!(
            accepted = report.accepted(),
            skipped = report.skipped.len(),
            "records imported"
        );
        Ok(report)
    }

    /// Derives a fresh view of the open book on every call.
    pub fn view(&self, filter: CategoryFilter) -> Result<DerivedView> {
        Ok(LedgerAggregator::derive(&self.book()?.entries, filter))
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        let (user, book) = self.active()?;
        let info = self.storage.backup_book(user, book, note)?;
        info!(user, backup = %info.id, "backup created");
        Ok(info)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let (user, _) = self.active()?;
        Ok(self.storage.list_backups(user)?)
    }

    /// Restores a backup of the open user by file name or by 1-based position
    /// in the newest-first listing.
    pub fn restore(&mut self, reference: &str) -> Result<BackupInfo> {
        let backups = self.list_backups()?;
        let reference = reference.trim();
        let chosen = match reference.parse::<usize>() {
            Ok(position) if position >= 1 && position <= backups.len() => {
                backups.get(position - 1).cloned()
            }
            _ => backups.iter().find(|info| info.id == reference).cloned(),
        }
        .ok_or_else(|| AppError::InvalidInput(format!("no backup matches `{reference}`")))?;
        let book = self.storage.restore_backup(&chosen)?;
        info!(backup = %chosen.id, entries = book.len(), "backup restored");
        self.current = Some(book);
        Ok(chosen)
    }

    pub fn list_users(&self) -> Result<Vec<String>> {
        Ok(self.storage.list_users()?)
    }

    /// Deletes a stored book; closes it first when it is the open one.
    pub fn delete_user(&mut self, user: &str) -> Result<()> {
        self.storage.delete_book(user)?;
        let is_open = self
            .current_user
            .as_deref()
            .is_some_and(|current| current.eq_ignore_ascii_case(user.trim()));
        if is_open {
            self.close();
        }
        info!(user, "entry book deleted");
        Ok(())
    }

    fn active(&self) -> Result<(&str, &EntryBook)> {
        match (self.current_user.as_deref(), self.current.as_ref()) {
            (Some(user), Some(book)) => Ok((user, book)),
            _ => Err(AppError::BookNotOpen),
        }
    }

    /// Applies a change to a copy of the book and keeps it only once saved.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut EntryBook) -> std::result::Result<T, CoreError>,
    ) -> Result<T> {
        let (user, book) = self.active()?;
        let mut staged = book.clone();
        let outcome = change(&mut staged)?;
        self.storage.save_book(user, &staged)?;
        self.current = Some(staged);
        Ok(outcome)
    }
}
