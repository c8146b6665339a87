//! 차트 이미지 endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// 차트 이미지 조회.
///
/// 요청마다 차트를 다시 생성하고 PNG를 반환합니다.
/// GET /chartimg/{symbol}/{period}/{interval}
pub async fn chart_image(
    State(state): State<Arc<AppState>>,
    Path((symbol, period, interval)): Path<(String, String, String)>,
) -> ApiResult<impl IntoResponse> {
    debug!(%symbol, %period, %interval, "차트 이미지 요청");

    let bytes = state.charts.chart_bytes(&symbol, &period, &interval).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes,
    ))
}

/// 차트 라우터 생성.
pub fn chart_router() -> Router<Arc<AppState>> {
    Router::new().route("/{symbol}/{period}/{interval}", get(chart_image))
}
