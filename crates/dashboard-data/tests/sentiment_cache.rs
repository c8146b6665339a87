//! 공포/탐욕 지수 캐시 통합 테스트.

mod common;

use std::time::Duration;

use common::StubSentimentSource;
use dashboard_data::{DataError, SentimentCache};

const TTL: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn stock_url_is_cached_until_ttl() {
    let source = StubSentimentSource::new();
    let cache = SentimentCache::new(Duration::from_millis(400), source.clone());

    let first = cache.snapshot_url("stock").await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(cache.snapshot_url("stock").await.unwrap(), first);
    assert_eq!(source.resolve_count(), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let refreshed = cache.snapshot_url("stock").await.unwrap();
    assert_ne!(refreshed, first);
    assert_eq!(source.resolve_count(), 2);
}

#[tokio::test]
async fn crypto_uses_fixed_url() {
    let cache = SentimentCache::new(TTL, StubSentimentSource::new());
    let bytes = cache.snapshot_bytes("crypto").await.unwrap();
    assert_eq!(
        bytes,
        b"https://alternative.me/crypto/fear-and-greed-index.png".to_vec()
    );
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let source = StubSentimentSource::new();
    let cache = SentimentCache::new(TTL, source.clone());

    let err = cache.snapshot_url("bonds").await.unwrap_err();
    assert!(matches!(err, DataError::UnknownCategory(ref name) if name == "bonds"));
    assert!(matches!(
        cache.snapshot_bytes("").await,
        Err(DataError::UnknownCategory(_))
    ));
    assert_eq!(source.resolve_count(), 0);
}

#[tokio::test]
async fn missing_needle_chart_is_not_cached() {
    let source = StubSentimentSource::new();
    let cache = SentimentCache::new(TTL, source.clone());
    source.set_broken_page(true);

    let err = cache.snapshot_url("stock").await.unwrap_err();
    assert!(matches!(err, DataError::SentimentFetch { .. }));

    source.set_broken_page(false);
    assert!(cache.snapshot_url("stock").await.is_ok());
    assert_eq!(source.resolve_count(), 2);
}

#[tokio::test]
async fn shutdown_flushes() {
    let source = StubSentimentSource::new();
    let cache = SentimentCache::new(TTL, source.clone());

    cache.snapshot_url("stock").await.unwrap();
    cache.shutdown().await;
    cache.snapshot_url("stock").await.unwrap();

    assert_eq!(source.resolve_count(), 2);
}
