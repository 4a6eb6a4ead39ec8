use chrono::NaiveDate;
use fintrack_core::{storage::EntryStorage, CoreError};
use fintrack_domain::{Category, EntryBook, LedgerEntry};
use fintrack_storage_json::{load_book_from_path, JsonEntryStorage, StoragePaths};
use std::fs;
use tempfile::tempdir;

fn sample_book(owner: &str) -> EntryBook {
    let mut book = EntryBook::new(owner);
    book.push(LedgerEntry::new(
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        0.0,
        50.0,
        Category::Food,
    ));
    book.push(
        LedgerEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            1000.0,
            0.0,
            Category::Salary,
        )
        .with_description("January pay"),
    );
    book
}

#[test]
fn json_storage_saves_and_loads_books() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    let book = sample_book("Asha");
    storage.save_book("Asha", &book).expect("save book");
    let loaded = storage.load_book("asha").expect("load book");

    assert_eq!(loaded, book);
    let path = storage.book_path("Asha");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert_eq!(storage.list_users().unwrap(), vec!["asha".to_string()]);
}

#[test]
fn unknown_user_is_reported() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let err = storage.load_book("nobody").unwrap_err();
    assert!(matches!(err, CoreError::BookNotFound(name) if name == "nobody"));
    assert!(storage.delete_book("nobody").is_err());
}

#[test]
fn overwriting_keeps_a_backup_of_the_previous_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    let mut book = sample_book("ravi");
    storage.save_book("ravi", &book).expect("first save");
    assert!(storage.list_backups("ravi").unwrap().is_empty());

    book.entries.clear();
    storage.save_book("ravi", &book).expect("second save");
    let backups = storage.list_backups("ravi").expect("list backups");
    assert_eq!(backups.len(), 1);

    let previous = storage.restore_backup(&backups[0]).expect("restore");
    assert_eq!(previous.entries.len(), 2);
    assert_eq!(storage.load_book("ravi").unwrap().entries.len(), 2);
}

#[test]
fn explicit_backups_are_listed_newest_first_and_pruned() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::with_retention(StoragePaths::under(dir.path()), 3)
        .expect("create storage");
    let book = sample_book("mira");
    storage.save_book("mira", &book).expect("save");

    let mut created = Vec::new();
    for idx in 0..5 {
        let info = storage
            .backup_book("mira", &book, Some(&format!("snapshot {idx}")))
            .expect("backup");
        created.push(info);
    }

    let backups = storage.list_backups("mira").expect("list");
    assert_eq!(backups.len(), 3);
    assert!(backups.iter().any(|info| info.id == created[4].id));
    assert!(created[4].id.contains("snapshot-4"));
    assert!(created[4].path.starts_with(dir.path().join("backups").join("mira")));

    let metadata = storage.list_backup_metadata("mira").expect("metadata");
    assert!(metadata.iter().all(|row| row.size_bytes > 0));
}

#[test]
fn automatic_backups_never_evict_labelled_ones() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let mut book = sample_book("asha");
    storage.save_book("asha", &book).expect("save");
    let named = storage
        .backup_book("asha", &book, Some("before import"))
        .expect("backup");
    let unnamed = storage.backup_book("asha", &book, None).expect("backup");
    assert!(unnamed.id.ends_with("_manual.json"));

    for idx in 0..12 {
        book.owner = format!("asha-{idx}");
        storage.save_book("asha", &book).expect("save");
    }

    let backups = storage.list_backups("asha").expect("list");
    assert!(backups.iter().any(|info| info.id == named.id));
    assert!(backups.iter().any(|info| info.id == unnamed.id));
    assert_eq!(backups.len(), 7);
    let newest = storage.restore_backup(&backups[0]).expect("restore");
    assert_eq!(newest.owner, "asha-10");
}

#[test]
fn restoring_keeps_the_replaced_book_as_a_backup() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let mut book = sample_book("asha");
    storage.save_book("asha", &book).expect("save");
    let early = storage.backup_book("asha", &book, Some("early")).expect("backup");

    book.owner = "asha-latest".into();
    storage.save_book("asha", &book).expect("save");
    storage.restore_backup(&early).expect("restore");
    assert_eq!(storage.load_book("asha").unwrap().owner, "asha");

    let recovered = storage
        .list_backups("asha")
        .expect("list")
        .iter()
        .filter_map(|info| load_book_from_path(&info.path).ok())
        .any(|saved| saved.owner == "asha-latest");
    assert!(recovered);
}

#[test]
fn metadata_summarises_each_book() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    storage.save_book("Zed", &sample_book("Zed")).unwrap();
    storage.save_book("Asha", &EntryBook::new("Asha")).unwrap();

    let rows = storage.list_book_metadata().expect("metadata");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].owner, "Asha");
    assert_eq!(rows[0].entry_count, 0);
    assert_eq!(rows[1].entry_count, 2);
    assert_eq!(rows[1].balance, 950.0);
}

#[test]
fn delete_removes_the_book_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    storage.save_book("temp", &EntryBook::new("temp")).unwrap();
    storage.delete_book("temp").expect("delete");
    assert!(storage.list_users().unwrap().is_empty());
}

#[test]
fn books_without_schema_version_still_load() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let legacy = r#"{
        "owner": "legacy",
        "entries": [{
            "id": "8c1d8f0e-2f43-4c0a-9c1e-7d3b5f1a2b3c",
            "date": "2024-02-01",
            "expense": 200.0,
            "category": "Bills",
            "created_at": "2024-02-01T00:00:00Z",
            "updated_at": "2024-02-01T00:00:00Z"
        }],
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-02-01T00:00:00Z"
    }"#;
    fs::write(storage.book_path("legacy"), legacy).expect("write legacy");

    let book = storage.load_book("legacy").expect("load legacy");
    assert_eq!(book.entries[0].income, 0.0);
    assert_eq!(book.entries[0].category, Category::Bills);
}
