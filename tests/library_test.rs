use animetime::calc::{DEFAULT_LOCALE, compute_at};
use animetime::error::AppError;
use animetime::library::{FileStore, LIBRARY_VERSION, Library, LibraryStore};
use chrono::{NaiveDate, TimeZone, Utc};
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn sample() -> animetime::calc::CalculationResult {
    let now = Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).unwrap();
    compute_at(25, 24, now, DEFAULT_LOCALE).unwrap()
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());

    let library = store.load().unwrap();
    assert_eq!(library, Library::default());
    assert_eq!(library.version, LIBRARY_VERSION);
}

#[test]
fn test_empty_file_loads_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("library.json"), "  \n").unwrap();
    let store = FileStore::in_dir(dir.path());

    assert!(store.load().unwrap().saved_results.is_empty());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("library.json"), "{ not json").unwrap();
    let store = FileStore::in_dir(dir.path());

    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("Failed to parse library JSON"));
}

#[test]
fn test_saved_and_scheduled_survive_reload() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    let result = sample();
    let start = Utc.with_ymd_and_hms(2026, 10, 20, 19, 0, 0).unwrap();

    let id = store
        .update(|library| {
            let saved_on = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
            library.save_result(&result, "Cowboy Bebop", saved_on)?;
            let image = Some("https://img/cb.jpg".to_string());
            let item = library.schedule(&result, "Cowboy Bebop", start, image)?;
            Ok(item.id.clone())
        })
        .unwrap();

    let reloaded = FileStore::in_dir(dir.path()).load().unwrap();
    assert_eq!(reloaded.saved_results.len(), 1);
    assert_eq!(reloaded.saved_results[0].anime_name, "Cowboy Bebop");
    assert_eq!(reloaded.saved_results[0].result.saved_at.as_deref(), Some("17/10/2026"));
    assert_eq!(reloaded.scheduled[0].id, id);
    assert_eq!(reloaded.scheduled[0].start_date, start);
    assert_eq!(
        reloaded.scheduled[0].image_url.as_deref(),
        Some("https://img/cb.jpg")
    );
}

#[test]
fn test_file_uses_camel_case_fields() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    let result = sample();

    store
        .update(|library| {
            library.save_result(&result, "Trigun", NaiveDate::from_ymd_opt(2026, 1, 2).unwrap())?;
            Ok(())
        })
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.data_path()).unwrap()).unwrap();
    let entry = &raw["savedResults"][0];
    assert_eq!(entry["animeName"], "Trigun");
    assert_eq!(entry["durationPerEpisode"], 24);
    assert_eq!(entry["savedAt"], "2/1/2026");
}

#[test]
fn test_failed_update_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    let result = sample();
    let start = Utc.with_ymd_and_hms(2026, 10, 20, 19, 0, 0).unwrap();

    store
        .update(|library| {
            library.schedule(&result, "Trigun", start, None)?;
            Ok(())
        })
        .unwrap();

    let err = store.update(|library| library.unschedule("no-such-id")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::NotFound(_))
    ));
    assert_eq!(store.load().unwrap().scheduled.len(), 1);
}

#[test]
fn test_concurrent_lock() {
    let dir = tempdir().unwrap();
    let path = dir.path().to_path_buf();

    // Spawn a thread that holds the lock for 500ms
    let handle = thread::spawn(move || {
        FileStore::in_dir(&path)
            .update(|library| {
                library.version = "locked".to_string();
                thread::sleep(Duration::from_millis(500));
                Ok(())
            })
            .unwrap();
    });

    // Give thread time to acquire lock
    thread::sleep(Duration::from_millis(100));

    let start = std::time::Instant::now();
    FileStore::in_dir(dir.path())
        .update(|library| {
            assert_eq!(library.version, "locked");
            library.version = "updated".to_string();
            Ok(())
        })
        .unwrap();

    assert!(
        start.elapsed().as_millis() >= 300,
        "Should have waited for lock"
    );

    handle.join().unwrap();

    assert_eq!(FileStore::in_dir(dir.path()).load().unwrap().version, "updated");
}
