//! 시세 스냅샷.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 한 종목의 시세 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// 티커
    pub symbol: String,
    /// 표시 이름 (long name → short name → 티커 순)
    pub name: String,
    /// 현재가
    pub price: Decimal,
    /// 당일 저가
    pub day_low: Decimal,
    /// 당일 고가
    pub day_high: Decimal,
    /// 거래량
    pub volume: i64,
    /// 전일 대비 변동
    pub change: Decimal,
    /// 전일 대비 변동률 (0.0123 = 1.23%)
    pub change_percent: f64,
    /// 조회 시각
    pub fetched_at: DateTime<Utc>,
}

impl QuoteSnapshot {
    /// 모든 수치가 0인 스냅샷.
    ///
    /// 시세 제공자가 결과 없이 응답했을 때 사용합니다.
    pub fn zeroed(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            price: Decimal::ZERO,
            day_low: Decimal::ZERO,
            day_high: Decimal::ZERO,
            volume: 0,
            change: Decimal::ZERO,
            change_percent: 0.0,
            fetched_at: Utc::now(),
        }
    }

    /// 상승 여부.
    pub fn is_up(&self) -> bool {
        self.change > Decimal::ZERO
    }
}
