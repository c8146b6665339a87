//! # Dashboard Core
//!
//! 시장 대시보드의 핵심 도메인 타입을 제공합니다:
//! - 거래 세션 분류기
//! - 차트 키, 기간/간격 토큰, 시세 스냅샷
//! - 설정 관리
//! - 로깅 초기화

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod types;

pub use config::*;
pub use error::*;
pub use session::*;
pub use types::*;
