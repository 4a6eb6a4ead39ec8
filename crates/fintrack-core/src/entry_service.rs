//! Create, edit and delete rules for entries held in an [`EntryBook`].

use std::cmp::Reverse;

use fintrack_domain::{EntryBook, EntryDraft, IngestReport, LedgerEntry, RawEntry};
use tracing::warn;
use uuid::Uuid;

use crate::{Clock, CoreError};

/// Shortest id prefix accepted when addressing an entry.
pub const MIN_ID_PREFIX: usize = 4;

pub struct EntryService;

impl EntryService {
    /// Validates the draft and appends a new entry with a fresh id.
    pub fn add(book: &mut EntryBook, draft: &EntryDraft, clock: &dyn Clock) -> Result<Uuid, CoreError> {
        let valid = draft.validate()?;
        let entry = valid.into_entry(clock.now());
        Ok(book.push(entry))
    }

    /// Replaces the editable fields of an existing entry.
    pub fn update(
        book: &mut EntryBook,
        id: Uuid,
        draft: &EntryDraft,
        clock: &dyn Clock,
    ) -> Result<(), CoreError> {
        let valid = draft.validate()?;
        let stamp = clock.now();
        let entry = book.entry_mut(id).ok_or(CoreError::EntryNotFound(id))?;
        entry.apply(&valid, stamp);
        book.updated_at = stamp;
        Ok(())
    }

    pub fn remove(book: &mut EntryBook, id: Uuid) -> Result<LedgerEntry, CoreError> {
        book.remove(id).ok_or(CoreError::EntryNotFound(id))
    }

    pub fn get(book: &EntryBook, id: Uuid) -> Result<&LedgerEntry, CoreError> {
        book.entry(id).ok_or(CoreError::EntryNotFound(id))
    }

    /// Finds an entry by full id or by a unique id prefix.
    pub fn resolve(book: &EntryBook, token: &str) -> Result<Uuid, CoreError> {
        let token = token.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&token) {
            return Self::get(book, id).map(|entry| entry.id);
        }
        if token.len() < MIN_ID_PREFIX || !token.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Err(CoreError::Validation(format!(
                "`{token}` is not an entry id (use at least {MIN_ID_PREFIX} hex characters)"
            )));
        }
        let mut matches = book
            .entries
            .iter()
            .filter(|entry| entry.id.to_string().starts_with(&token));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id),
            (Some(_), Some(_)) => Err(CoreError::Validation(format!(
                "id prefix `{token}` matches more than one entry"
            ))),
            (None, _) => Err(CoreError::Validation(format!("no entry id starts with `{token}`"))),
        }
    }

    /// Newest first: date descending, then most recently created.
    pub fn list_recent(book: &EntryBook) -> Vec<&LedgerEntry> {
        let mut listed: Vec<&LedgerEntry> = book.entries.iter().collect();
        listed.sort_by_key(|entry| Reverse((entry.date, entry.created_at)));
        listed
    }

    /// Coerces raw records and appends the accepted ones.
    pub fn import(book: &mut EntryBook, raws: Vec<RawEntry>, clock: &dyn Clock) -> IngestReport {
        let mut report = IngestReport::from_raw(raws, clock.now());
        for note in &report.notes {
            warn!(owner = %book.owner, "{note}");
        }
        for skipped in &report.skipped {
            warn!(
                owner = %book.owner,
                record = skipped.index,
                reason = %skipped.reason,
                "record skipped"
            );
        }
        for entry in &report.entries {
            book.push(entry.clone());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};
    use fintrack_domain::Category;

    use super::*;
    use crate::FixedClock;

    fn clock(text: &str) -> FixedClock {
        FixedClock(DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_requires_date() {
        let mut book = EntryBook::new("asha");
        let draft = EntryDraft::default().expense(10.0);
        let err = EntryService::add(&mut book, &draft, &clock("2024-01-01T00:00:00Z")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref msg) if msg == "date is required"));
        assert!(book.is_empty());
    }

    #[test]
    fn add_fills_defaults_and_stamps() {
        let mut book = EntryBook::new("asha");
        let clock = clock("2024-01-05T08:00:00Z");
        let id = EntryService::add(&mut book, &EntryDraft::on(date(2024, 1, 5)), &clock).unwrap();
        let entry = EntryService::get(&book, id).unwrap();
        assert_eq!(entry.category, Category::Other);
        assert_eq!(entry.income, 0.0);
        assert_eq!(entry.created_at, clock.0);
    }

    #[test]
    fn update_unknown_entry_fails() {
        let mut book = EntryBook::new("asha");
        let id = Uuid::new_v4();
        let err = EntryService::update(
            &mut book,
            id,
            &EntryDraft::on(date(2024, 1, 5)),
            &clock("2024-01-05T08:00:00Z"),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EntryNotFound(missing) if missing == id));
    }

    #[test]
    fn update_refreshes_fields_and_stamp() {
        let mut book = EntryBook::new("asha");
        let id = EntryService::add(
            &mut book,
            &EntryDraft::on(date(2024, 1, 5)).expense(20.0),
            &clock("2024-01-05T08:00:00Z"),
        )
        .unwrap();
        let later = clock("2024-01-06T08:00:00Z");
        let draft = EntryDraft::on(date(2024, 1, 4))
            .expense(25.0)
            .category(Category::Food)
            .description("lunch");
        EntryService::update(&mut book, id, &draft, &later).unwrap();

        let entry = EntryService::get(&book, id).unwrap();
        assert_eq!(entry.date, date(2024, 1, 4));
        assert_eq!(entry.expense, 25.0);
        assert_eq!(entry.description.as_deref(), Some("lunch"));
        assert_eq!(entry.updated_at, later.0);
        assert_ne!(entry.created_at, entry.updated_at);
    }

    #[test]
    fn resolve_accepts_unique_prefixes() {
        let mut book = EntryBook::new("asha");
        let clock = clock("2024-01-05T08:00:00Z");
        let id = EntryService::add(&mut book, &EntryDraft::on(date(2024, 1, 5)), &clock).unwrap();
        let prefix = &id.to_string()[..8];
        assert_eq!(EntryService::resolve(&book, prefix).unwrap(), id);
        assert_eq!(EntryService::resolve(&book, &id.to_string()).unwrap(), id);
        assert!(EntryService::resolve(&book, "ab").is_err());
        assert!(EntryService::resolve(&book, "zzzz").is_err());
    }

    #[test]
    fn list_recent_orders_newest_first() {
        let mut book = EntryBook::new("asha");
        let first = EntryService::add(
            &mut book,
            &EntryDraft::on(date(2024, 1, 5)),
            &clock("2024-01-05T08:00:00Z"),
        )
        .unwrap();
        let second = EntryService::add(
            &mut book,
            &EntryDraft::on(date(2024, 1, 5)),
            &clock("2024-01-05T09:00:00Z"),
        )
        .unwrap();
        let oldest = EntryService::add(
            &mut book,
            &EntryDraft::on(date(2023, 12, 31)),
            &clock("2024-01-05T10:00:00Z"),
        )
        .unwrap();
        let ids: Vec<_> = EntryService::list_recent(&book).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first, oldest]);
    }

    #[test]
    fn remove_returns_the_entry() {
        let mut book = EntryBook::new("asha");
        let id = EntryService::add(
            &mut book,
            &EntryDraft::on(date(2024, 1, 5)),
            &clock("2024-01-05T08:00:00Z"),
        )
        .unwrap();
        assert_eq!(EntryService::remove(&mut book, id).unwrap().id, id);
        assert!(matches!(
            EntryService::remove(&mut book, id),
            Err(CoreError::EntryNotFound(_))
        ));
    }
}
