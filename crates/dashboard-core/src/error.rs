//! 대시보드 핵심 에러 타입.
//!
//! 세션 분류기 생성, 설정 검증, 도메인 토큰 파싱에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러 (시간대/세션 경계 등) - 시작 시 치명적
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력 (알 수 없는 기간/간격 토큰 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 시작 단계에서 복구 불가능한 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Config(_))
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
