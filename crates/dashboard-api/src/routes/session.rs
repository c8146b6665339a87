//! 거래 세션 상태 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use dashboard_core::SessionState;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

const DATE_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// 현재 세션 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: SessionState,
    pub label: String,
    /// 기준 시간대 현재 시각
    pub reference_time: String,
    pub reference_timezone: String,
    /// 표시 시간대 현재 시각
    pub display_time: String,
    pub display_timezone: String,
}

/// GET /api/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let now = Utc::now();
    let session = state.session.current_session();
    let reference = state.classifier.to_reference(&now);
    let display = state.classifier.to_display(&now);

    Json(SessionResponse {
        session,
        label: session.label().to_string(),
        reference_time: reference.format(DATE_TIME_LAYOUT).to_string(),
        reference_timezone: reference.timezone().name().to_string(),
        display_time: display.format(DATE_TIME_LAYOUT).to_string(),
        display_timezone: display.timezone().name().to_string(),
    })
}

pub fn session_router() -> Router<Arc<AppState>> {
    Router::new().route("/session", get(get_session))
}
