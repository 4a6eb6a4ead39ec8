//! Persisted per-user collection of ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entry::LedgerEntry;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// One user's entries in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryBook {
    pub owner: String,
    #[serde(default = "EntryBook::default_schema_version")]
    pub schema_version: u8,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntryBook {
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            owner: owner.into(),
            schema_version: CURRENT_SCHEMA_VERSION,
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn default_schema_version() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: Uuid) -> Option<&LedgerEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut LedgerEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn push(&mut self, entry: LedgerEntry) -> Uuid {
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<LedgerEntry> {
        let idx = self.entries.iter().position(|entry| entry.id == id)?;
        let removed = self.entries.remove(idx);
        self.touch();
        Some(removed)
    }
}
