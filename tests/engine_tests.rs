//! Tests for Engine
//!
//! These tests verify:
//! - Read/write/delete scenarios end to end
//! - Default file resolution
//! - Write sources (literal, context key)
//! - Lock release on every exit path
//! - Lost-update freedom under concurrent writers
//! - Batch execution with and without continue-on-fail

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use jsondb::lock::{lock_dir_for, now_millis, Sentinel};
use jsondb::{Config, Engine, ErrorKind, JsonDbError, Request, Response, WriteSource};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine, String) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .default_db_path(temp_dir.path().join("JsonDatabase.Global.json"))
        .lock_timeout_ms(2000)
        .build();
    let engine = Engine::new(config).unwrap();
    let file = temp_dir.path().join("db.json").to_string_lossy().into_owned();
    (temp_dir, engine, file)
}

fn write(path: &str, file: &str, value: Option<Value>) -> Request {
    Request::write(path, file, WriteSource::Value(value))
}

fn on_disk(path: impl AsRef<Path>) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn assert_unlocked(file: &str) {
    assert!(!lock_dir_for(&PathBuf::from(file)).exists(), "lock left behind");
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_write_read_delete_scenario() {
    let (_temp, engine, file) = setup_temp_engine();

    let written = engine.execute(write("a.b", &file, Some(json!(5)))).unwrap();
    assert_eq!(written, Some(json!(5)));
    assert_eq!(on_disk(&file), json!({ "a": { "b": 5 } }));

    let read = engine.execute(Request::read("a.b", &file)).unwrap();
    assert_eq!(read, Some(json!(5)));

    let deleted = engine.execute(write("a.b", &file, None)).unwrap();
    assert_eq!(deleted, None);
    assert_eq!(on_disk(&file), json!({ "a": {} }));
    assert_eq!(engine.execute(Request::read("a.b", &file)).unwrap(), None);

    assert_unlocked(&file);
}

#[test]
fn test_delete_middle_array_element() {
    let (_temp, engine, file) = setup_temp_engine();
    engine.execute(write("l", &file, Some(json!([1, 2, 3])))).unwrap();

    let blank = WriteSource::JsonLiteral(String::new());
    let deleted = engine.execute(Request::write("l[1]", &file, blank)).unwrap();

    assert_eq!(deleted, None);
    assert_eq!(on_disk(&file), json!({ "l": [1, 3] }));
    assert_eq!(engine.execute(Request::read("l", &file)).unwrap(), Some(json!([1, 3])));
    assert_unlocked(&file);
}

#[test]
fn test_delete_first_array_element_does_not_report_neighbour() {
    let (_temp, engine, file) = setup_temp_engine();
    engine.execute(write("l", &file, Some(json!([1, 2, 3])))).unwrap();

    let deleted = engine.execute(write("l[0]", &file, None)).unwrap();

    assert_eq!(deleted, None);
    assert_eq!(on_disk(&file), json!({ "l": [2, 3] }));
}

#[test]
fn test_huge_index_fails_and_releases_lock() {
    let (_temp, engine, file) = setup_temp_engine();
    engine.execute(write("l", &file, Some(json!([1])))).unwrap();

    for path in ["l[18446744073709551615]", "l[4000000000]"] {
        let response = engine.respond(write(path, &file, Some(json!(1))));
        assert!(matches!(
            response,
            Response::Error { kind: ErrorKind::IndexOutOfRange, .. }
        ));
        assert_unlocked(&file);
    }
    assert_eq!(on_disk(&file), json!({ "l": [1] }));
}

#[test]
fn test_root_scalar_write_rejected() {
    let (_temp, engine, file) = setup_temp_engine();
    engine.execute(write("k", &file, Some(json!(1)))).unwrap();

    let err = engine.execute(write("", &file, Some(json!("x")))).unwrap_err();
    assert!(matches!(err, JsonDbError::InvalidRootAssignment));
    assert_eq!(on_disk(&file), json!({ "k": 1 }));
    assert_unlocked(&file);
}

#[test]
fn test_root_read_returns_whole_document() {
    let (_temp, engine, file) = setup_temp_engine();
    engine.execute(write("x", &file, Some(json!([1])))).unwrap();

    let root = engine.execute(Request::read("", &file)).unwrap();
    assert_eq!(root, Some(json!({ "x": [1] })));
}

#[test]
fn test_read_missing_file_does_not_lock_or_create() {
    let (temp, engine, file) = setup_temp_engine();

    assert_eq!(engine.execute(Request::read("", &file)).unwrap(), Some(json!({})));
    assert_eq!(engine.execute(Request::read("a", &file)).unwrap(), None);
    assert!(!Path::new(&file).exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_read_missing_file_ignores_held_lock() {
    let (_temp, engine, file) = setup_temp_engine();
    let sentinel = Sentinel::new(lock_dir_for(Path::new(&file)));
    sentinel.try_create().unwrap();
    sentinel.write_heartbeat(now_millis() + 60_000).unwrap();

    assert_eq!(engine.execute(Request::read("a", &file)).unwrap(), None);
}

// =============================================================================
// File Resolution Tests
// =============================================================================

#[test]
fn test_blank_file_uses_default() {
    let (temp, engine, _) = setup_temp_engine();
    engine.execute(write("g", "   ", Some(json!(true)))).unwrap();

    let default_db = temp.path().join("JsonDatabase.Global.json");
    assert_eq!(on_disk(&default_db), json!({ "g": true }));
    assert_eq!(engine.resolve_file_path(""), default_db);
}

#[test]
fn test_file_path_is_trimmed() {
    let (_temp, engine, file) = setup_temp_engine();
    engine.execute(write("t", &format!("  {}  ", file), Some(json!(1)))).unwrap();
    assert_eq!(on_disk(&file), json!({ "t": 1 }));
}

// =============================================================================
// Write Source Tests
// =============================================================================

#[test]
fn test_json_literal_source() {
    let (_temp, engine, file) = setup_temp_engine();

    let source = WriteSource::JsonLiteral(r#"{ "name": "cookie" }"#.to_string());
    engine.execute(Request::write(r#"monsters["cookie-monster"]"#, &file, source)).unwrap();
    assert_eq!(on_disk(&file), json!({ "monsters": { "cookie-monster": { "name": "cookie" } } }));

    let blank = WriteSource::JsonLiteral(String::new());
    engine.execute(Request::write(r#"monsters["cookie-monster"]"#, &file, blank)).unwrap();
    assert_eq!(on_disk(&file), json!({ "monsters": {} }));
}

#[test]
fn test_context_key_source() {
    let (_temp, engine, file) = setup_temp_engine();
    let source = WriteSource::ContextKey {
        context: json!({ "data": { "score": 42 } }),
        key: "data".to_string(),
    };

    let result = engine.execute(Request::write("player", &file, source)).unwrap();
    assert_eq!(result, Some(json!({ "score": 42 })));
}

#[test]
fn test_invalid_literal_fails_before_locking() {
    let (_temp, engine, file) = setup_temp_engine();
    let source = WriteSource::JsonLiteral("{oops".to_string());

    let err = engine.execute(Request::write("a", &file, source)).unwrap_err();
    assert!(matches!(err, JsonDbError::SourceParse(_)));
    assert!(!Path::new(&file).exists());
    assert_unlocked(&file);
}

#[test]
fn test_path_syntax_error() {
    let (_temp, engine, file) = setup_temp_engine();
    let err = engine.execute(Request::read("a[\"b", &file)).unwrap_err();
    assert!(matches!(err, JsonDbError::PathSyntax { .. }));
}

// =============================================================================
// Lock Release Tests
// =============================================================================

#[test]
fn test_lock_released_after_parse_error() {
    let (_temp, engine, file) = setup_temp_engine();
    fs::write(&file, "{ broken").unwrap();

    let err = engine.execute(write("a", &file, Some(json!(1)))).unwrap_err();
    assert!(matches!(err, JsonDbError::DocumentParse { .. }));
    assert_unlocked(&file);
    // The broken file is left alone
    assert_eq!(fs::read_to_string(&file).unwrap(), "{ broken");
}

#[test]
fn test_lock_released_after_io_error() {
    let (temp, engine, _) = setup_temp_engine();
    // A directory where the data file should be: exists, but cannot be read
    let file = temp.path().join("dir.json");
    fs::create_dir(&file).unwrap();
    let file = file.to_string_lossy().into_owned();

    let err = engine.execute(Request::read("a", &file)).unwrap_err();
    assert!(matches!(err, JsonDbError::Io(_)));
    assert_unlocked(&file);
}

#[test]
fn test_lock_timeout_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder().lock_timeout_ms(200).build();
    let engine = Engine::new(config).unwrap();
    let file = temp.path().join("db.json");
    fs::write(&file, r#"{"a":1}"#).unwrap();

    // A live holder in "another process"
    let sentinel = Sentinel::new(lock_dir_for(&file));
    sentinel.try_create().unwrap();
    let keep_alive = {
        let sentinel = sentinel.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                let _ = sentinel.touch();
                thread::sleep(std::time::Duration::from_millis(25));
            }
        })
    };

    let err = engine
        .execute(write("a", &file.to_string_lossy(), Some(json!(2))))
        .unwrap_err();
    assert!(matches!(err, JsonDbError::LockTimeout { .. }));
    assert_eq!(fs::read_to_string(&file).unwrap(), r#"{"a":1}"#);
    // Holder's sentinel is not ours to remove
    assert!(sentinel.exists());

    keep_alive.join().unwrap();
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writers_lose_no_updates() {
    let (_temp, engine, file) = setup_temp_engine();
    let config = engine.config().clone();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let config = config.clone();
            let file = file.clone();
            thread::spawn(move || {
                // Separate engine per thread, like separate processes
                let engine = Engine::new(config).unwrap();
                for j in 0..5 {
                    let path = format!("writers.w{}[{}]", i, j);
                    engine.execute(write(&path, &file, Some(json!(j)))).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let doc = on_disk(&file);
    for i in 0..8 {
        assert_eq!(doc["writers"][format!("w{}", i)], json!([0, 1, 2, 3, 4]));
    }
    assert_unlocked(&file);
}

// =============================================================================
// Batch / Response Tests
// =============================================================================

#[test]
fn test_execute_all_continue_on_fail() {
    let (_temp, engine, file) = setup_temp_engine();
    let requests = vec![
        write("a", &file, Some(json!(1))),
        write("", &file, Some(json!(2))),
        Request::read("a", &file),
    ];

    let responses = engine.execute_all(requests, true).unwrap();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0], Response::Data(Some(json!(1))));
    assert!(matches!(
        responses[1],
        Response::Error { kind: ErrorKind::InvalidRootAssignment, .. }
    ));
    assert_eq!(responses[2], Response::Data(Some(json!(1))));
}

#[test]
fn test_execute_all_stops_on_first_error() {
    let (_temp, engine, file) = setup_temp_engine();
    let requests = vec![
        write("", &file, Some(json!(2))),
        write("a", &file, Some(json!(1))),
    ];

    let err = engine.execute_all(requests, false).unwrap_err();
    assert!(matches!(err, JsonDbError::InvalidRootAssignment));
    assert!(!Path::new(&file).exists());
}

#[test]
fn test_respond_shapes() {
    let (_temp, engine, file) = setup_temp_engine();

    let ok = engine.respond(write("a", &file, Some(json!({ "b": 1 }))));
    assert_eq!(ok.to_json(), json!({ "data": { "b": 1 } }));

    let err = engine.respond(Request::read("a[", &file));
    assert_eq!(err.to_json()["error"]["kind"], json!("PathSyntaxError"));
}

#[test]
fn test_engine_rejects_zero_timeout() {
    let config = Config::builder().lock_timeout_ms(0).build();
    assert!(matches!(Engine::new(config), Err(JsonDbError::Config(_))));
}
