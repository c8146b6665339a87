//! 시세 제공자.
//!
//! Yahoo Finance `quoteSummary` API의 `price` 모듈에서 현재 시세를 가져옵니다.
//!
//! ```text
//! GET {base}/v10/finance/quoteSummary/{symbol}?modules=price
//! ```
//!
//! 응답의 수치 필드는 `{ "raw": ..., "fmt": ... }` 형태이며 `raw` 값만 사용합니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashboard_core::QuoteSnapshot;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::{DataError, Result};

/// 시세 제공자 트레잇.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 심볼의 현재 시세를 조회합니다.
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot>;
}

/// `quoteSummary` 응답.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    #[serde(default)]
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSummaryResult {
    #[serde(default)]
    pub price: Option<PriceModule>,
}

/// `price` 모듈. 모든 필드는 없을 수 있습니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceModule {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub regular_market_price: RawValue,
    pub regular_market_day_low: RawValue,
    pub regular_market_day_high: RawValue,
    pub regular_market_volume: RawValue,
    pub regular_market_change: RawValue,
    pub regular_market_change_percent: RawValue,
}

/// `{ "raw": 1.23, "fmt": "1.23" }`. 빈 객체 `{}`도 허용합니다.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

impl RawValue {
    fn decimal(&self) -> Decimal {
        self.raw.and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO)
    }

    fn float(&self) -> f64 {
        self.raw.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    fn integer(&self) -> i64 {
        self.float() as i64
    }
}

/// 응답을 스냅샷으로 변환합니다.
///
/// 결과가 없으면 모든 수치가 0이고 이름이 심볼인 스냅샷을 반환합니다.
/// 없는 수치 필드는 0으로 채웁니다.
pub fn snapshot_from_summary(symbol: &str, response: QuoteSummaryResponse) -> QuoteSnapshot {
    let price = response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|result| result.price);

    let Some(price) = price else {
        return QuoteSnapshot::zeroed(symbol);
    };

    let name = [price.long_name.as_deref(), price.short_name.as_deref()]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
        .unwrap_or(symbol)
        .to_string();

    QuoteSnapshot {
        symbol: symbol.to_string(),
        name,
        price: price.regular_market_price.decimal(),
        day_low: price.regular_market_day_low.decimal(),
        day_high: price.regular_market_day_high.decimal(),
        volume: price.regular_market_volume.integer(),
        change: price.regular_market_change.decimal(),
        change_percent: price.regular_market_change_percent.float(),
        fetched_at: Utc::now(),
    }
}

/// Yahoo Finance 시세 제공자.
#[derive(Debug, Clone)]
pub struct YahooQuoteProvider {
    client: Client,
    base_url: String,
}

impl YahooQuoteProvider {
    /// 새 제공자를 생성합니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn fetch_error(symbol: &str, message: impl ToString) -> DataError {
        DataError::QuoteFetch {
            symbol: symbol.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", "price")])
            .send()
            .await
            .map_err(|e| Self::fetch_error(symbol, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::fetch_error(symbol, format!("HTTP {}", status)));
        }

        let summary: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| Self::fetch_error(symbol, e))?;

        let snapshot = snapshot_from_summary(symbol, summary);
        debug!(symbol, price = %snapshot.price, "시세 수신");
        Ok(snapshot)
    }
}
