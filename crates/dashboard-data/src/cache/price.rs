//! 세션별 시세 캐시.
//!
//! 저장소 두 개를 번갈아 사용합니다:
//!
//! | 세션 | 저장소 | 만료 |
//! |------|--------|------|
//! | 프리마켓/정규장/애프터마켓 | regular | 기본 5분 |
//! | 장 마감 | overnight | 항목별 12시간 |
//!
//! 매 조회마다 현재 세션이 아닌 쪽 저장소를 비우므로 두 저장소가 동시에
//! 채워져 있는 일은 없고, 세션 전환은 다음 조회에서 바로 반영됩니다.

use std::sync::Arc;
use std::time::Duration;

use dashboard_core::{PriceConfig, QuoteSnapshot, SessionSource};
use tracing::{debug, instrument, warn};

use super::store::TtlStore;
use crate::error::{DataError, Result};
use crate::provider::QuoteProvider;

/// 시세 캐시 설정.
#[derive(Debug, Clone)]
pub struct PriceCacheConfig {
    /// 장중 저장소 기본 만료
    pub regular_ttl: Duration,
    /// 야간 항목 만료
    pub overnight_ttl: Duration,
}

impl Default for PriceCacheConfig {
    fn default() -> Self {
        Self::from(&PriceConfig::default())
    }
}

impl From<&PriceConfig> for PriceCacheConfig {
    fn from(config: &PriceConfig) -> Self {
        Self {
            regular_ttl: config.regular_ttl(),
            overnight_ttl: config.overnight_ttl(),
        }
    }
}

/// 시세 캐시 엔진.
pub struct PriceCache {
    config: PriceCacheConfig,
    regular: TtlStore<String, QuoteSnapshot>,
    /// 기본 만료 없음, 항목마다 명시적 만료
    overnight: TtlStore<String, QuoteSnapshot>,
    provider: Arc<dyn QuoteProvider>,
    session: Arc<dyn SessionSource>,
}

impl PriceCache {
    pub fn new(
        config: PriceCacheConfig,
        provider: Arc<dyn QuoteProvider>,
        session: Arc<dyn SessionSource>,
    ) -> Self {
        Self {
            regular: TtlStore::new(Some(config.regular_ttl)),
            overnight: TtlStore::new(None),
            config,
            provider,
            session,
        }
    }

    /// 시세를 조회합니다.
    ///
    /// 조회 실패는 캐시하지 않고 그대로 반환합니다.
    #[instrument(skip(self))]
    pub async fn get_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(DataError::InvalidInput("심볼이 비어 있음".to_string()));
        }
        let key = symbol.to_string();

        if self.session.current_session().is_closed() {
            self.regular.flush().await;

            if let Some(quote) = self.overnight.get(&key).await {
                debug!("야간 캐시 적중");
                return Ok(quote);
            }

            let quote = self.provider.fetch_quote(symbol).await?;
            self.overnight
                .set_with_ttl(key, quote.clone(), Some(self.config.overnight_ttl))
                .await;
            Ok(quote)
        } else {
            self.overnight.flush().await;

            if let Some(quote) = self.regular.get(&key).await {
                debug!("장중 캐시 적중");
                return Ok(quote);
            }

            let quote = self.provider.fetch_quote(symbol).await?;
            self.regular.set_default(key, quote.clone()).await;
            Ok(quote)
        }
    }

    /// 여러 심볼을 순서대로 조회합니다. 실패한 심볼은 로그를 남기고 건너뜁니다.
    pub async fn get_quotes<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<QuoteSnapshot> {
        let mut quotes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.get_quote(symbol.as_ref()).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => warn!(symbol = symbol.as_ref(), error = %e, "시세 조회 실패, 건너뜀"),
            }
        }
        quotes
    }

    /// (장중, 야간) 저장소 항목 수.
    pub async fn store_sizes(&self) -> (usize, usize) {
        (self.regular.len().await, self.overnight.len().await)
    }

    /// 두 저장소를 모두 비웁니다.
    pub async fn shutdown(&self) {
        self.regular.flush().await;
        self.overnight.flush().await;
        debug!("시세 캐시 종료");
    }
}
