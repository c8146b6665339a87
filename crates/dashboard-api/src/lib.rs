//! 대시보드 HTTP 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 차트/지수 이미지 endpoint
//! - 관심 종목 시세 JSON endpoint
//! - 거래 세션 상태와 헬스 체크
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`watchlist`]: 페이지별 관심 종목
//! - [`error`]: 캐시 엔진 에러의 HTTP 변환

pub mod error;
pub mod routes;
pub mod state;
pub mod watchlist;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::test_support::create_test_state;
