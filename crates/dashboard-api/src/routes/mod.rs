//! REST API 라우트.
//!
//! - `/chartimg/{symbol}/{period}/{interval}`: 차트 이미지
//! - `/indeximg/{category}`: 공포/탐욕 지수 이미지
//! - `/api/quotes/{symbol}`, `/api/pages/{page}`: 시세
//! - `/api/session`: 현재 거래 세션
//! - `/health`: 헬스 체크

pub mod chart;
pub mod health;
pub mod quotes;
pub mod sentiment;
pub mod session;

use std::sync::Arc;

use axum::Router;

pub use chart::chart_router;
pub use health::{health_router, HealthResponse};
pub use quotes::{quotes_router, PageResponse, QuoteRow};
pub use sentiment::sentiment_router;
pub use session::{session_router, SessionResponse};

use crate::state::AppState;

/// 전체 라우터 생성.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/chartimg", chart_router())
        .nest("/indeximg", sentiment_router())
        .nest("/api", quotes_router().merge(session_router()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use dashboard_core::SessionState;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_wires_every_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(create_test_state(dir.path(), SessionState::RegularHours));
        let app = create_router().with_state(state);

        for uri in [
            "/health",
            "/health/ready",
            "/chartimg/MSFT/1y/1wk",
            "/indeximg/crypto",
            "/api/quotes/MSFT",
            "/api/pages/index",
            "/api/session",
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(create_test_state(dir.path(), SessionState::RegularHours));
        let app = create_router().with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/chartmap").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
