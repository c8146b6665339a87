//! 시세 캐시 통합 테스트.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{StubQuoteProvider, StubSession};
use dashboard_core::SessionState;
use dashboard_data::{DataError, PriceCache, PriceCacheConfig};
use rust_decimal::Decimal;

fn engine(state: SessionState) -> (PriceCache, Arc<StubQuoteProvider>, Arc<StubSession>) {
    let provider = StubQuoteProvider::new();
    let session = StubSession::new(state);
    let cache = PriceCache::new(
        PriceCacheConfig::default(),
        provider.clone(),
        session.clone(),
    );
    (cache, provider, session)
}

/// 장중 400ms, 야간 800ms로 줄인 엔진.
fn short_ttl_engine(state: SessionState) -> (PriceCache, Arc<StubQuoteProvider>) {
    let provider = StubQuoteProvider::new();
    let config = PriceCacheConfig {
        regular_ttl: Duration::from_millis(400),
        overnight_ttl: Duration::from_millis(800),
    };
    let cache = PriceCache::new(config, provider.clone(), StubSession::new(state));
    (cache, provider)
}

#[tokio::test]
async fn regular_store_expires_after_its_ttl() {
    let (cache, provider) = short_ttl_engine(SessionState::RegularHours);

    let first = cache.get_quote("AAPL").await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    let second = cache.get_quote("AAPL").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(provider.call_count(), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let third = cache.get_quote("AAPL").await.unwrap();
    assert_eq!(provider.call_count(), 2);
    assert_ne!(first.price, third.price);
}

#[tokio::test]
async fn overnight_entries_use_overnight_ttl() {
    let (cache, provider) = short_ttl_engine(SessionState::Closed);

    cache.get_quote("BTC-USD").await.unwrap();
    // 장중 TTL은 지났지만 야간 TTL 안
    tokio::time::sleep(Duration::from_millis(500)).await;
    cache.get_quote("BTC-USD").await.unwrap();
    assert_eq!(provider.call_count(), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    cache.get_quote("BTC-USD").await.unwrap();
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn session_switch_flushes_other_store() {
    let (cache, provider, session) = engine(SessionState::RegularHours);

    cache.get_quote("AAPL").await.unwrap();
    cache.get_quote("MSFT").await.unwrap();
    assert_eq!(cache.store_sizes().await, (2, 0));

    session.set(SessionState::Closed);
    cache.get_quote("AAPL").await.unwrap();
    assert_eq!(cache.store_sizes().await, (0, 1));
    assert_eq!(provider.call_count(), 3);

    // 장 재개 시 야간 저장소가 비워지고 다시 조회
    session.set(SessionState::PreMarket);
    cache.get_quote("AAPL").await.unwrap();
    assert_eq!(cache.store_sizes().await, (1, 0));
    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn open_sessions_share_regular_store() {
    let (cache, provider, session) = engine(SessionState::PreMarket);

    cache.get_quote("TSLA").await.unwrap();
    session.set(SessionState::RegularHours);
    cache.get_quote("TSLA").await.unwrap();
    session.set(SessionState::AfterHours);
    cache.get_quote("TSLA").await.unwrap();

    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn empty_provider_response_yields_zeroed_snapshot() {
    let (cache, provider, _) = engine(SessionState::RegularHours);
    provider.empty_symbol("ZZZZ");

    let quote = cache.get_quote("ZZZZ").await.unwrap();

    assert_eq!(quote.name, "ZZZZ");
    assert_eq!(quote.price, Decimal::ZERO);
    assert_eq!(quote.day_low, Decimal::ZERO);
    assert_eq!(quote.day_high, Decimal::ZERO);
    assert_eq!(quote.volume, 0);
    assert_eq!(quote.change, Decimal::ZERO);
    assert_eq!(quote.change_percent, 0.0);
}

#[tokio::test]
async fn fetch_failure_is_not_cached() {
    let (cache, provider, _) = engine(SessionState::RegularHours);
    provider.fail_symbol("AAPL");

    let err = cache.get_quote("AAPL").await.unwrap_err();
    assert!(matches!(err, DataError::QuoteFetch { .. }));
    assert_eq!(cache.store_sizes().await, (0, 0));

    provider.recover_symbol("AAPL");
    assert!(cache.get_quote("AAPL").await.is_ok());
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn get_quotes_skips_failures() {
    let (cache, provider, _) = engine(SessionState::RegularHours);
    provider.fail_symbol("TWTR");

    let quotes = cache.get_quotes(&["GOOG", "TWTR", "AMZN"]).await;
    let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["GOOG", "AMZN"]);
}

#[tokio::test]
async fn blank_symbol_is_invalid() {
    let (cache, provider, _) = engine(SessionState::RegularHours);
    assert!(matches!(
        cache.get_quote("  ").await,
        Err(DataError::InvalidInput(_))
    ));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn shutdown_flushes_both_stores() {
    let (cache, _, session) = engine(SessionState::RegularHours);
    cache.get_quote("AAPL").await.unwrap();
    session.set(SessionState::Closed);

    cache.shutdown().await;
    cache.shutdown().await;
    assert_eq!(cache.store_sizes().await, (0, 0));
}
