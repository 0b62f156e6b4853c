mod common;

use common::{CACHE_TTL, MemoryStore, create_engine, known_prefixes, published_table};
use std::sync::Arc;
use std::time::Duration;
use url_mapper::application::services::{ResolveError, Tier};
use url_mapper::domain::entities::RedirectEntry;
use url_mapper::domain::repositories::RemoteError;
use url_mapper::domain::static_table::{StaticTableHandle, parse_table};

#[tokio::test]
async fn test_static_internal_entry() {
    let store = Arc::new(MemoryStore::new());
    let engine = create_engine(published_table("ua I /foo /internal/foo"), store.clone());

    let resolution = engine.resolve("ua", "/foo").await.unwrap();

    assert_eq!(resolution.tier, Tier::Static);
    assert_eq!(resolution.entry, RedirectEntry::internal("/internal/foo"));
    assert_eq!(store.fetches(), 0);
}

#[tokio::test]
async fn test_static_external_entry() {
    let store = Arc::new(MemoryStore::new());
    let engine = create_engine(
        published_table("ru 301 /bar https://new.example/bar"),
        store.clone(),
    );

    let resolution = engine.resolve("ru", "/bar").await.unwrap();

    assert_eq!(resolution.tier, Tier::Static);
    assert_eq!(
        resolution.entry,
        RedirectEntry::external("https://new.example/bar")
    );
}

#[tokio::test]
async fn test_static_entry_wins_over_remote() {
    let store = Arc::new(MemoryStore::new());
    store.put("ua:/foo", "301 https://remote.example/foo");
    let engine = create_engine(published_table("ua I /foo /internal/foo"), store.clone());

    let resolution = engine.resolve("ua", "/foo").await.unwrap();

    assert_eq!(resolution.entry, RedirectEntry::internal("/internal/foo"));
    assert_eq!(store.fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_remote_value_is_cached_for_ttl() {
    let store = Arc::new(MemoryStore::new());
    store.put("ua:/baz", "I /baz");
    let engine = create_engine(StaticTableHandle::new(), store.clone());

    let first = engine.resolve("ua", "/baz").await.unwrap();
    assert_eq!(first.tier, Tier::Remote);
    assert_eq!(first.entry, RedirectEntry::internal("/baz"));
    assert_eq!(store.fetches(), 1);

    tokio::time::advance(CACHE_TTL - Duration::from_millis(1)).await;
    let second = engine.resolve("ua", "/baz").await.unwrap();
    assert_eq!(second.tier, Tier::Cache);
    assert_eq!(second.entry, first.entry);
    assert_eq!(store.fetches(), 1);

    tokio::time::advance(Duration::from_millis(1)).await;
    let third = engine.resolve("ua", "/baz").await.unwrap();
    assert_eq!(third.tier, Tier::Remote);
    assert_eq!(store.fetches(), 2);
}

#[tokio::test]
async fn test_not_found_until_store_is_populated() {
    let store = Arc::new(MemoryStore::new());
    let engine = create_engine(StaticTableHandle::new(), store.clone());

    for attempt in 1..=3 {
        let err = engine.resolve("ua", "/late").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert_eq!(store.fetches(), attempt);
    }

    store.put("ua:/late", "301 https://late.example/");

    let resolution = engine.resolve("ua", "/late").await.unwrap();
    assert_eq!(resolution.tier, Tier::Remote);
    assert_eq!(
        resolution.entry,
        RedirectEntry::external("https://late.example/")
    );
}

#[tokio::test]
async fn test_malformed_remote_value_is_decode_error() {
    let store = Arc::new(MemoryStore::new());
    store.put("ua:/bad", "I /a /b");
    let engine = create_engine(StaticTableHandle::new(), store.clone());

    let err = engine.resolve("ua", "/bad").await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Remote {
            source: RemoteError::Decode { .. },
            ..
        }
    ));

    // Failures are not cached either.
    engine.resolve("ua", "/bad").await.unwrap_err();
    assert_eq!(store.fetches(), 2);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_table() {
    let store = Arc::new(MemoryStore::new());
    let table = published_table("ua I /foo /internal/foo");
    let engine = create_engine(table.clone(), store);

    let result = parse_table("ua I /foo\n", &known_prefixes());
    assert!(result.is_err());

    let resolution = engine.resolve("ua", "/foo").await.unwrap();
    assert_eq!(resolution.entry, RedirectEntry::internal("/internal/foo"));
    assert_eq!(table.current().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeated_resolution_is_stable() {
    let store = Arc::new(MemoryStore::new());
    store.put("ru:/x", "301 https://x.example/");
    let engine = create_engine(published_table("ua I /foo /internal/foo"), store);

    let first_static = engine.resolve("ua", "/foo").await.unwrap().entry;
    let first_remote = engine.resolve("ru", "/x").await.unwrap().entry;
    for _ in 0..10 {
        assert_eq!(engine.resolve("ua", "/foo").await.unwrap().entry, first_static);
        assert_eq!(engine.resolve("ru", "/x").await.unwrap().entry, first_remote);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_during_table_swaps() {
    let store = Arc::new(MemoryStore::new());
    let table = published_table("ua I /a /v1/a\nua I /b /v1/b");
    let engine = Arc::new(create_engine(table.clone(), store));

    let publisher = {
        let table = table.clone();
        tokio::spawn(async move {
            for i in 0..200 {
                let version = if i % 2 == 0 { "v2" } else { "v1" };
                let source = format!("ua I /a /{version}/a\nua I /b /{version}/b");
                table.publish(parse_table(&source, &known_prefixes()).unwrap());
                tokio::task::yield_now().await;
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..8 {
        let table = table.clone();
        let engine = engine.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..500 {
                // A single snapshot never mixes versions.
                let snapshot = table.current().unwrap();
                let a = &snapshot.lookup("ua", "/a").unwrap().target;
                let b = &snapshot.lookup("ua", "/b").unwrap().target;
                assert_eq!(a[..3], b[..3]);

                let resolution = engine.resolve("ua", "/a").await.unwrap();
                assert_eq!(resolution.tier, Tier::Static);
            }
        }));
    }

    publisher.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_may_each_fetch() {
    let store = Arc::new(MemoryStore::new());
    store.put("ua:/hot", "I /hot");
    let engine = Arc::new(create_engine(StaticTableHandle::new(), store.clone()));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(
            async move { engine.resolve("ua", "/hot").await },
        ));
    }
    for task in tasks {
        let resolution = task.await.unwrap().unwrap();
        assert_eq!(resolution.entry, RedirectEntry::internal("/hot"));
    }

    let fetches = store.fetches();
    assert!((1..=16).contains(&fetches));
    assert_eq!(engine.cache().len(), 1);
}
