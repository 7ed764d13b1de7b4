//! Saved search persistence tests
//!
//! Runs the saved search store against a real file in a temp directory.

use chrono::NaiveDate;
use findex_core::domain::search::{
    Corpus, DateRange, Entity, EntityType, Query, SavedQueryStore, SearchService, SortBy,
    SortOrder, TextMatch, restore_query,
};
use findex_core::storage::JsonFileSavedQueryRepository;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open(path: &std::path::Path) -> SavedQueryStore<JsonFileSavedQueryRepository> {
    SavedQueryStore::open(JsonFileSavedQueryRepository::new(path)).unwrap()
}

fn busy_query() -> Query {
    Query::new("payment")
        .with_types([EntityType::Tasks, EntityType::Teams])
        .with_text_match(TextMatch::StartsWith)
        .with_date_range(DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 12, 31))))
        .with_owner("ana")
        .with_tag("bug")
        .with_status("pending")
        .with_show_archived(true)
        .with_sort(SortBy::Date, SortOrder::Asc)
}

#[test]
fn test_save_then_apply_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("saved_searches.json");
    let query = busy_query();

    open(&path).save("Q1", &query).unwrap();

    let reopened = open(&path);
    assert_eq!(reopened.len(), 1);
    let restored = reopened.apply(&reopened.list()[0]);
    assert_eq!(restored, query);
    assert_eq!(
        restored.date_range,
        Some(DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 12, 31))))
    );
}

#[test]
fn test_restored_query_searches_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_searches.json");
    let corpus = Corpus::from_entities([
        Entity::new(EntityType::Tasks, 1, "Payment retries")
            .with_owner("ana")
            .with_status("pending")
            .with_tags(["bug"])
            .with_created_at(date(2024, 5, 1)),
        Entity::new(EntityType::Tasks, 2, "Payment audit")
            .with_owner("ana")
            .with_status("pending")
            .with_tags(["bug"])
            .with_created_at(date(2024, 2, 1)),
        Entity::new(EntityType::Teams, 3, "Payments")
            .with_owner("ana")
            .with_created_at(date(2023, 2, 1)),
    ]);
    let service = SearchService::new(&corpus);
    let query = busy_query();

    let mut store = open(&path);
    store.save("Q1", &query).unwrap();
    let restored = open(&path).find_latest("Q1").unwrap().apply();

    assert_eq!(service.search(&restored), service.search(&query));
    let ids: Vec<i64> = service.search(&restored).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn test_file_holds_iso_dates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_searches.json");

    open(&path).save("Q1", &busy_query()).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"from\": \"2024-01-01\""));
    assert!(raw.contains("\"to\": \"2024-12-31\""));
    assert!(!dir.path().join("saved_searches.json.tmp").exists());
}

#[test]
fn test_older_shape_on_disk_gets_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_searches.json");
    std::fs::write(
        &path,
        r#"[{"name":"legacy","query":{"freeText":"bug","dateRange":{"from":"2024-01-15T10:00:00.000Z"}}}]"#,
    )
    .unwrap();

    let store = open(&path);
    let restored = store.apply(&store.list()[0]);

    assert_eq!(restored.free_text, "bug");
    assert_eq!(restored.date_range, Some(DateRange::since(date(2024, 1, 15))));
    assert_eq!(restored.selected_types.len(), EntityType::all().len());
    assert_eq!(restored.sort_order, SortOrder::Desc);
}

#[test]
fn test_delete_out_of_range_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_searches.json");

    let mut store = open(&path);
    store.save("a", &Query::default()).unwrap();
    store.save("b", &Query::new("x")).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    store.delete(2).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

    store.delete(0).unwrap();
    let reopened = open(&path);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.list()[0].name, "b");
}

#[test]
fn test_corrupt_file_is_set_aside() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_searches.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut store = open(&path);
    assert!(store.is_empty());
    assert!(dir.path().join("saved_searches.json.corrupt").exists());

    store.save("fresh", &Query::default()).unwrap();
    assert_eq!(open(&path).len(), 1);
}

#[test]
fn test_restore_is_idempotent_through_serialization() {
    let query = busy_query();
    let once = restore_query(&serde_json::to_value(&query).unwrap());
    let twice = restore_query(&serde_json::to_value(&once).unwrap());

    assert_eq!(once, query);
    assert_eq!(twice, once);
}
