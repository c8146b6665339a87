//! 공포/탐욕 지수 이미지 endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::ApiResult;
use crate::state::AppState;

/// 지수 이미지 조회.
///
/// GET /indeximg/{category} (`stock` | `crypto`)
pub async fn index_image(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let bytes = state.sentiment.snapshot_bytes(&category).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

pub fn sentiment_router() -> Router<Arc<AppState>> {
    Router::new().route("/{category}", get(index_image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorResponse;
    use crate::state::test_support::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use dashboard_core::SessionState;
    use tower::ServiceExt;

    fn app(dir: &std::path::Path) -> Router {
        let state = Arc::new(create_test_state(dir, SessionState::Closed));
        Router::new()
            .nest("/indeximg", sentiment_router())
            .with_state(state)
    }

    #[tokio::test]
    async fn test_stock_index_image() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/indeximg/stock")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"https://example.test/stock.png");
    }

    #[tokio::test]
    async fn test_unknown_category_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/indeximg/bonds")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let err: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "UNKNOWN_CATEGORY");
    }
}
