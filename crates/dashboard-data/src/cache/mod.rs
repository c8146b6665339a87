//! 캐싱 레이어.
//!
//! - TTL 저장소: 엔진들이 공유하는 만료 기반 키-값 저장소
//! - 차트 캐시: 디스크 차트 이미지 + 세션 기반 백그라운드 갱신
//! - 시세 캐시: 장중/야간 저장소 교대
//! - 공포/탐욕 지수 캐시: 분류별 이미지 URL

pub mod chart;
pub mod price;
pub mod sentiment;
pub mod store;

pub use chart::{ChartCache, ChartCacheConfig, ChartEntry, RefreshStats};
pub use price::{PriceCache, PriceCacheConfig};
pub use sentiment::SentimentCache;
pub use store::TtlStore;
