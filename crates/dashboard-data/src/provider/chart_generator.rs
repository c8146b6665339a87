//! 차트 이미지 생성기.
//!
//! 외부 실행 파일을 `<bin> <symbol> <period> <interval> <path>` 형태로 호출합니다.
//! 생성기는 주어진 경로에 PNG 파일을 쓰고 0으로 종료해야 합니다.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use dashboard_core::ChartKey;
use tokio::process::Command;
use tracing::debug;

use crate::error::{DataError, Result};

/// 차트 생성기 트레잇.
#[async_trait]
pub trait ChartGenerator: Send + Sync {
    /// `key`의 차트를 `path`에 생성합니다.
    async fn generate(&self, key: &ChartKey, path: &Path) -> Result<()>;
}

/// 스크립트 기반 차트 생성기.
#[derive(Debug, Clone)]
pub struct ScriptChartGenerator {
    program: PathBuf,
}

impl ScriptChartGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl ChartGenerator for ScriptChartGenerator {
    async fn generate(&self, key: &ChartKey, path: &Path) -> Result<()> {
        debug!(
            program = %self.program.display(),
            key = %key,
            path = %path.display(),
            "차트 생성기 실행"
        );

        let output = Command::new(&self.program)
            .arg(&key.symbol)
            .arg(key.period.as_str())
            .arg(key.interval.as_str())
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DataError::Generation {
                key: key.to_string(),
                message: format!("{} 실행 실패: {}", self.program.display(), e),
            })?;

        if !output.status.success() {
            // stdout + stderr
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            return Err(DataError::Generation {
                key: key.to_string(),
                message: format!("{}: {}", output.status, combined.trim()),
            });
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn key() -> ChartKey {
        ChartKey::parse("^GSPC", "1mo", "1d").unwrap()
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let generator = ScriptChartGenerator::new("true");
        generator
            .generate(&key(), Path::new("/tmp/unused.png"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_generation_error() {
        let generator = ScriptChartGenerator::new("false");
        let err = generator
            .generate(&key(), Path::new("/tmp/unused.png"))
            .await
            .unwrap_err();

        match err {
            DataError::Generation { key, .. } => assert_eq!(key, "^GSPC/1mo/1d"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_generation_error() {
        let generator = ScriptChartGenerator::new("/nonexistent/stock_chart.py");
        let err = generator
            .generate(&key(), Path::new("/tmp/unused.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Generation { .. }));
        assert!(err.is_retryable());
    }
}
