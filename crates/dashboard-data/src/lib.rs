//! 대시보드 캐시 엔진과 외부 데이터 제공자.
//!
//! 이 crate는 다음을 제공합니다:
//! - 세션에 따라 갱신하는 차트 이미지 캐시
//! - 장중/야간 시세 캐시
//! - 공포/탐욕 지수 이미지 캐시
//! - 차트 생성기, Yahoo 시세, 지수 이미지 웹 소스

pub mod cache;
pub mod error;
pub mod provider;

pub use cache::{
    ChartCache, ChartCacheConfig, ChartEntry, PriceCache, PriceCacheConfig, RefreshStats,
    SentimentCache, TtlStore,
};
pub use error::{DataError, Result};
pub use provider::{
    ChartGenerator, QuoteProvider, ScriptChartGenerator, SentimentCategory, SentimentSource,
    WebSentimentSource, YahooQuoteProvider,
};
