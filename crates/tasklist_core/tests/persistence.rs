use tasklist_core::db::{open_db, open_db_in_memory};
use tasklist_core::{
    decode_tasks, encode_tasks, KeyValuePersistence, KeyValueStore, MemoryKeyValueStore,
    PersistError, Priority, SqliteKeyValueStore, TaskPersistence, TaskStore, TASKS_STORAGE_KEY,
};

#[test]
fn memory_round_trip_preserves_ids_fields_and_order() {
    let mut store = TaskStore::new(KeyValuePersistence::new(MemoryKeyValueStore::new()));
    let a = store
        .add("a", "2030-01-01", Some(Priority::Low))
        .expect("add a");
    let b = store
        .add("b", "2030-01-02", Some(Priority::High))
        .expect("add b");
    store.toggle_completed(b.id).expect("toggle b");

    let loaded = store.persistence().load().expect("load saved list");
    assert!(!loaded.needs_resave());
    assert_eq!(loaded.tasks, store.all());
    assert_eq!(loaded.tasks[0].id, a.id);
    assert!(loaded.tasks[1].completed);
}

#[test]
fn empty_list_round_trips() {
    let mut persistence = KeyValuePersistence::new(MemoryKeyValueStore::new());
    persistence.save(&[]).expect("save empty list");

    assert_eq!(
        persistence
            .store()
            .get(TASKS_STORAGE_KEY)
            .expect("read raw")
            .as_deref(),
        Some("[]")
    );
    assert!(persistence.load().expect("load empty list").tasks.is_empty());
}

#[test]
fn wire_format_uses_camel_case_and_iso_dates() {
    let mut store = TaskStore::new(KeyValuePersistence::new(MemoryKeyValueStore::new()));
    let task = store
        .add("Buy milk", "2099-01-01", None)
        .expect("add task");

    let raw = encode_tasks(store.all()).expect("encode list");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    let record = &json[0];
    assert_eq!(record["id"], task.id.to_string());
    assert_eq!(record["text"], "Buy milk");
    assert_eq!(record["dueDate"], "2099-01-01");
    assert_eq!(record["priority"], "medium");
    assert_eq!(record["completed"], false);
    assert!(record["createdAt"].is_i64());

    assert_eq!(decode_tasks(&raw).expect("decode list").tasks, store.all());
}

#[test]
fn custom_key_isolates_lists() {
    let mut kv = MemoryKeyValueStore::new();
    {
        let mut work = KeyValuePersistence::with_key(&mut kv, "work");
        assert_eq!(work.key(), "work");
        let mut store = TaskStore::new(&mut work);
        store
            .add("ship release", "2030-01-01", None)
            .expect("add work task");
    }

    let home = KeyValuePersistence::new(&mut kv);
    assert!(home.load().expect("load home").tasks.is_empty());
    let work = KeyValuePersistence::with_key(&mut kv, "work");
    assert_eq!(work.load().expect("load work").tasks.len(), 1);
}

#[test]
fn sqlite_store_persists_across_connections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.sqlite3");

    let added_id = {
        let conn = open_db(&path).expect("open db");
        let kv = SqliteKeyValueStore::new(&conn);
        let mut store = TaskStore::open(KeyValuePersistence::new(kv));
        store
            .add("Pay rent", "2000-01-01", None)
            .expect("add rent");
        store
            .add("Buy milk", "2099-01-01", None)
            .expect("add milk")
            .id
    };

    let conn = open_db(&path).expect("reopen db");
    let kv = SqliteKeyValueStore::new(&conn);
    let mut store = TaskStore::open(KeyValuePersistence::new(kv));
    assert!(store.load_error().is_none());
    let texts = store
        .all()
        .iter()
        .map(|task| task.text.clone())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["Pay rent", "Buy milk"]);

    store.remove(added_id).expect("remove milk");
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .expect("count rows");
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_store_keeps_backfilled_ids_across_connections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("legacy.sqlite3");
    {
        let conn = open_db(&path).expect("open db");
        let mut kv = SqliteKeyValueStore::new(&conn);
        kv.set(
            TASKS_STORAGE_KEY,
            r#"[{"description":"Pay rent","dueDate":"2000-01-01","completed":true}]"#,
        )
        .expect("seed legacy list");
    }

    let first_id = {
        let conn = open_db(&path).expect("open db");
        let store = TaskStore::open(KeyValuePersistence::new(SqliteKeyValueStore::new(&conn)));
        store.all()[0].id
    };

    let conn = open_db(&path).expect("reopen db");
    let mut store = TaskStore::open(KeyValuePersistence::new(SqliteKeyValueStore::new(&conn)));
    assert_eq!(store.all()[0].id, first_id);
    assert_eq!(store.clear_completed().expect("clear completed"), 1);
    assert!(store.is_empty());
}

#[test]
fn sqlite_store_missing_key_loads_empty() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let persistence = KeyValuePersistence::new(SqliteKeyValueStore::new(&conn));
    assert!(persistence.load().expect("load").tasks.is_empty());
}

#[test]
fn sqlite_store_surfaces_corrupt_value() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let mut kv = SqliteKeyValueStore::new(&conn);
    kv.set(TASKS_STORAGE_KEY, "[{\"text\": 42}]")
        .expect("seed corrupt value");

    let store = TaskStore::open(KeyValuePersistence::new(kv));
    assert!(store.is_empty());
    assert!(matches!(store.load_error(), Some(PersistError::Decode(_))));
}
