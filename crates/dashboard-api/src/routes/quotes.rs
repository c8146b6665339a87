//! 시세 endpoint.
//!
//! 단일 종목 시세와 관심 종목 페이지 표를 JSON으로 제공합니다.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use dashboard_core::QuoteSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::watchlist;

/// 페이지 표의 한 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRow {
    pub symbol: String,
    pub name: String,
    /// `$1,234.50`
    pub price: String,
    /// `+1.25` / `-0.40`
    pub change: String,
    /// `+0.98%`
    pub change_percent: String,
    /// 변동이 음수가 아니면 true
    pub positive: bool,
}

impl From<&QuoteSnapshot> for QuoteRow {
    fn from(quote: &QuoteSnapshot) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            name: quote.name.clone(),
            price: format_money(quote.price),
            change: format_signed(quote.change),
            change_percent: format_percent(quote.change_percent),
            positive: quote.change >= Decimal::ZERO,
        }
    }
}

/// 관심 종목 페이지 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: String,
    pub title: String,
    /// 세션 코드 (`regular_hours` 등)
    pub session: String,
    pub session_label: String,
    pub rows: Vec<QuoteRow>,
}

/// 단일 종목 시세.
///
/// GET /api/quotes/{symbol}
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<QuoteSnapshot>> {
    let quote = state.prices.get_quote(&symbol).await?;
    Ok(Json(quote))
}

/// 관심 종목 페이지 표.
///
/// 조회에 실패한 종목은 표에서 빠집니다.
/// GET /api/pages/{page}
pub async fn get_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let list = watchlist::find(&page)
        .ok_or_else(|| ApiError::not_found(format!("Unknown page: {}", page)))?;

    let quotes = state.prices.get_quotes(list.symbols).await;
    let session = state.session.current_session();
    debug!(page = list.name, rows = quotes.len(), "페이지 시세 조회");

    Ok(Json(PageResponse {
        page: list.name.to_string(),
        title: list.title.to_string(),
        session: session.code().to_string(),
        session_label: session.label().to_string(),
        rows: quotes.iter().map(QuoteRow::from).collect(),
    }))
}

pub fn quotes_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes/{symbol}", get(get_quote))
        .route("/pages/{page}", get(get_page))
}

/// `$` 접두, 천 단위 구분, 소수 둘째 자리.
fn format_money(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.abs().round_dp(2));
    let (int_part, frac_part) = rounded
        .split_once('.')
        .unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac_part)
}

fn format_signed(value: Decimal) -> String {
    let value = value.round_dp(2);
    if value > Decimal::ZERO {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn format_percent(ratio: f64) -> String {
    if ratio > 0.0 {
        format!("+{:.2}%", ratio * 100.0)
    } else {
        format!("{:.2}%", ratio * 100.0)
    }
}
