use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use fintrack_core::{
    storage::{BackupInfo, EntryStorage},
    CoreError, LedgerAggregator,
};
use fintrack_domain::EntryBook;

const BOOK_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const MANUAL_LABEL: &str = "manual";
pub const DEFAULT_RETENTION: usize = 5;

/// Directories holding the live books and their backups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub book_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    pub fn under(base: &Path) -> Self {
        Self {
            book_root: base.join("books"),
            backup_root: base.join("backups"),
        }
    }
}

/// Filesystem-backed JSON persistence: one document per user.
#[derive(Debug, Clone)]
pub struct JsonEntryStorage {
    paths: StoragePaths,
    retention: usize,
}

impl JsonEntryStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.book_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn book_path(&self, user: &str) -> PathBuf {
        self.paths
            .book_root
            .join(format!("{}.{}", canonical_name(user), BOOK_EXTENSION))
    }

    /// One row per stored book, sorted by owner name.
    pub fn list_book_metadata(&self) -> Result<Vec<BookMetadata>, CoreError> {
        let mut rows = Vec::new();
        for slug in self.list_users()? {
            let book = self.load_book(&slug)?;
            let summary = LedgerAggregator::compute_summary(&book.entries);
            rows.push(BookMetadata {
                path: self.book_path(&slug),
                slug,
                owner: book.owner.clone(),
                updated_at: book.updated_at,
                entry_count: summary.count,
                balance: summary.balance,
            });
        }
        rows.sort_by(|a, b| a.owner.cmp(&b.owner));
        Ok(rows)
    }

    pub fn list_backup_metadata(&self, user: &str) -> Result<Vec<BackupMetadata>, CoreError> {
        let mut rows = Vec::new();
        for info in self.list_backups(user)? {
            let size_bytes = fs::metadata(&info.path).map(|meta| meta.len()).unwrap_or(0);
            rows.push(BackupMetadata {
                created_at: parse_backup_timestamp(&info.id),
                name: info.id,
                size_bytes,
                path: info.path,
            });
        }
        Ok(rows)
    }

    fn backup_dir(&self, user: &str) -> PathBuf {
        self.paths.backup_root.join(canonical_name(user))
    }

    /// Writes `<timestamp>[-n][_label].json`. Unlabelled files are the
    /// automatic copies taken before an overwrite.
    fn write_backup(
        &self,
        user: &str,
        contents: &str,
        label: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        let dir = self.backup_dir(user);
        fs::create_dir_all(&dir)?;
        let now = Utc::now();
        let timestamp = format!(
            "{}{:03}",
            now.format(BACKUP_TIMESTAMP_FORMAT),
            now.timestamp_subsec_millis()
        );
        let suffix = label.map(|label| format!("_{label}")).unwrap_or_default();
        let mut taken = None;
        for entry in fs::read_dir(&dir)? {
            let name = entry?.file_name();
            if let Some(name) = name.to_str().filter(|name| name.starts_with(&timestamp)) {
                taken = taken.max(Some(backup_sequence(name)));
            }
        }
        let stem = match taken {
            Some(sequence) => format!("{timestamp}-{}", sequence + 1),
            None => timestamp.clone(),
        };
        let path = dir.join(format!("{stem}{suffix}.{BOOK_EXTENSION}"));
        write_atomic(&path, contents)?;
        self.prune_backups(user)?;
        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(BackupInfo {
            user: canonical_name(user),
            id,
            created_at: timestamp,
            path,
        })
    }

    fn backup_existing_file(&self, user: &str, path: &Path) -> Result<(), CoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => self.write_backup(user, &contents, None).map(|_| ()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Keeps the newest `retention` backups of each kind, so automatic
    /// copies never evict labelled ones.
    fn prune_backups(&self, user: &str) -> Result<(), CoreError> {
        let (labelled, automatic): (Vec<_>, Vec<_>) = self
            .list_backups(user)?
            .into_iter()
            .partition(|info| backup_label(&info.id).is_some());
        for group in [labelled, automatic] {
            for stale in group.into_iter().skip(self.retention) {
                let _ = fs::remove_file(stale.path);
            }
        }
        Ok(())
    }
}

impl EntryStorage for JsonEntryStorage {
    fn load_book(&self, user: &str) -> Result<EntryBook, CoreError> {
        let path = self.book_path(user);
        if !path.exists() {
            return Err(CoreError::BookNotFound(user.to_string()));
        }
        load_book_from_path(&path)
    }

    /// Copies the previous file into the backup directory, then replaces it
    /// via a temporary file and rename.
    fn save_book(&self, user: &str, book: &EntryBook) -> Result<(), CoreError> {
        let path = self.book_path(user);
        self.backup_existing_file(user, &path)?;
        save_book_to_path(book, &path)
    }

    fn list_users(&self) -> Result<Vec<String>, CoreError> {
        if !self.paths.book_root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.paths.book_root)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_book(&self, user: &str) -> Result<(), CoreError> {
        let path = self.book_path(user);
        if !path.exists() {
            return Err(CoreError::BookNotFound(user.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn backup_book(
        &self,
        user: &str,
        book: &EntryBook,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        let label = sanitize_backup_note(note).unwrap_or_else(|| MANUAL_LABEL.to_string());
        self.write_backup(user, &serialize_book(book)?, Some(&label))
    }

    /// Newest first.
    fn list_backups(&self, user: &str) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backup_dir(user);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(user);
        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                backups.push(BackupInfo {
                    user: slug.clone(),
                    id: file_name.to_string(),
                    created_at: file_name
                        .split(['_', '.'])
                        .next()
                        .unwrap_or_default()
                        .to_string(),
                    path: path.clone(),
                });
            }
        }
        backups.sort_by_key(|info| {
            Reverse((
                parse_backup_timestamp(&info.id),
                backup_sequence(&info.id),
                info.id.clone(),
            ))
        });
        Ok(backups)
    }

    fn restore_backup(&self, backup: &BackupInfo) -> Result<EntryBook, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let book = load_book_from_path(&backup.path)?;
        let target = self.book_path(&backup.user);
        self.backup_existing_file(&backup.user, &target)?;
        save_book_to_path(&book, &target)?;
        Ok(book)
    }
}

/// Writes a book to an arbitrary path through a temporary sibling file.
pub fn save_book_to_path(book: &EntryBook, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_book(book)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_book_from_path(path: &Path) -> Result<EntryBook, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| {
        CoreError::Serde(format!("{}: {}", path.display(), err))
    })
}

#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub slug: String,
    pub owner: String,
    pub path: PathBuf,
    pub updated_at: DateTime<Utc>,
    pub entry_count: usize,
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct BackupMetadata {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// File-system slug for a user name: lowercase ASCII letters and digits,
/// everything else replaced by `_`.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "user".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Label after the first `_` of a backup file name, if any.
fn backup_label(name: &str) -> Option<&str> {
    let stem = name
        .strip_suffix(BOOK_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(name);
    stem.split_once('_').map(|(_, label)| label)
}

/// Collision counter written as `-n` after the timestamp; `1` when absent.
fn backup_sequence(name: &str) -> u32 {
    name.split(['_', '.'])
        .next()
        .and_then(|stamp| stamp.get(18..))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|count| count.parse().ok())
        .unwrap_or(1)
}

/// Reads the `YYYYMMDD-HHMMSSmmm` prefix of a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stamp = name.split(['_', '.']).next()?.get(..18)?;
    if !stamp.is_char_boundary(15) {
        return None;
    }
    let (seconds, millis) = stamp.split_at(15);
    let naive = NaiveDateTime::parse_from_str(seconds, BACKUP_TIMESTAMP_FORMAT).ok()?;
    let millis: i64 = millis.parse().ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_book(book: &EntryBook) -> Result<String, CoreError> {
    serde_json::to_string_pretty(book).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_filesystem_safe() {
        assert_eq!(canonical_name("  Asha Rao "), "asha_rao");
        assert_eq!(canonical_name("../"), "user");
    }

    #[test]
    fn notes_collapse_to_dashes() {
        assert_eq!(
            sanitize_backup_note(Some("Before CSV import!")),
            Some("before-csv-import".into())
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
    }

    #[test]
    fn backup_names_carry_their_timestamp() {
        let parsed = parse_backup_timestamp("20240105-081530250_pre-import.json").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-05T08:15:30.250+00:00");
        assert!(parse_backup_timestamp("notes.json").is_none());
        assert!(parse_backup_timestamp("20240105-081530250-2.json").is_some());
    }

    #[test]
    fn labels_follow_the_timestamp() {
        assert_eq!(backup_label("20240105-081530250_pre-import.json"), Some("pre-import"));
        assert_eq!(backup_label("20240105-081530250-2_manual.json"), Some("manual"));
        assert_eq!(backup_label("20240105-081530250-2.json"), None);
        assert_eq!(backup_label("20240105-081530250.json"), None);
        assert_eq!(backup_sequence("20240105-081530250-12_manual.json"), 12);
        assert_eq!(backup_sequence("20240105-081530250.json"), 1);
    }
}
