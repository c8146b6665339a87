//! 데이터 모듈 오류 타입.

use dashboard_core::CoreError;
use thiserror::Error;

/// 캐시 엔진 및 외부 제공자 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),

    /// 잘못된 입력 (알 수 없는 기간/간격, 빈 심볼 등)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 차트 생성기 실행 실패
    #[error("Chart generation failed for {key}: {message}")]
    Generation { key: String, message: String },

    /// 시세 조회 실패
    #[error("Quote fetch failed for {symbol}: {message}")]
    QuoteFetch { symbol: String, message: String },

    /// 캐시 항목 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 알 수 없는 공포/탐욕 지수 분류
    #[error("Unknown sentiment category: {0}")]
    UnknownCategory(String),

    /// 공포/탐욕 지수 조회 실패
    #[error("Sentiment fetch failed for {category}: {message}")]
    SentimentFetch { category: String, message: String },

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// 외부 제공자 쪽 실패로 재시도할 만한 오류인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DataError::Generation { .. }
                | DataError::QuoteFetch { .. }
                | DataError::SentimentFetch { .. }
        )
    }
}

impl From<CoreError> for DataError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(msg) => DataError::Config(msg),
            CoreError::InvalidInput(msg) => DataError::InvalidInput(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        let err = DataError::QuoteFetch {
            symbol: "AAPL".to_string(),
            message: "timeout".to_string(),
        };
        assert!(err.is_retryable());
        assert!(!DataError::NotFound("x".to_string()).is_retryable());
        assert!(!DataError::UnknownCategory("bonds".to_string()).is_retryable());
    }

    #[test]
    fn test_from_core_error() {
        let err: DataError = CoreError::InvalidInput("알 수 없는 간격: 7m".to_string()).into();
        assert!(matches!(err, DataError::InvalidInput(_)));
    }
}
