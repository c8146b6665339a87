//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 기본값 → TOML 파일(선택) → `DASHBOARD__` 환경 변수 순으로 덮어씁니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 거래 세션 설정
    #[serde(default)]
    pub session: SessionConfig,
    /// 차트 캐시 설정
    #[serde(default)]
    pub chart: ChartConfig,
    /// 시세 캐시 설정
    #[serde(default)]
    pub price: PriceConfig,
    /// 공포/탐욕 지수 캐시 설정
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초) - 차트 생성이 수 초 걸릴 수 있음
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 60,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 거래 세션 설정.
///
/// 경계 시각은 `timezone`(거래소 현지 시간) 기준 `HH:MM:SS` 문자열입니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 기준 시간대 (IANA 이름)
    pub timezone: String,
    /// 화면 표시용 시간대
    pub display_timezone: String,
    /// 프리마켓 시작
    pub pre_market_start: String,
    /// 정규장 시작
    pub market_start: String,
    /// 정규장 종료 (= 애프터마켓 시작)
    pub market_end: String,
    /// 애프터마켓 종료
    pub after_market_end: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            display_timezone: "America/Phoenix".to_string(),
            pre_market_start: "07:00:00".to_string(),
            market_start: "09:30:00".to_string(),
            market_end: "16:00:00".to_string(),
            after_market_end: "17:00:00".to_string(),
        }
    }
}

/// 차트 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// 차트 생성 실행 파일 경로
    pub generator_bin: PathBuf,
    /// 차트 이미지 저장 디렉토리
    pub output_dir: PathBuf,
    /// 차트 보관 기간 (초, 기본: 2일)
    pub retention_secs: u64,
    /// 분봉 차트 갱신 주기 (초, 기본: 15분)
    pub short_refresh_secs: u64,
    /// 일봉 이상 차트 갱신 주기 (초, 기본: 30분)
    pub long_refresh_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            generator_bin: PathBuf::from("exec/stock_chart.py"),
            output_dir: PathBuf::from("charts"),
            retention_secs: 48 * 60 * 60,
            short_refresh_secs: 15 * 60,
            long_refresh_secs: 30 * 60,
        }
    }
}

impl ChartConfig {
    /// 보관 기간을 Duration으로 반환
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// 분봉 갱신 주기를 Duration으로 반환
    pub fn short_refresh(&self) -> Duration {
        Duration::from_secs(self.short_refresh_secs)
    }

    /// 일봉 이상 갱신 주기를 Duration으로 반환
    pub fn long_refresh(&self) -> Duration {
        Duration::from_secs(self.long_refresh_secs)
    }

    /// 보관 기간과 갱신 주기는 0보다 커야 합니다.
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("chart.retention_secs", self.retention_secs),
            ("chart.short_refresh_secs", self.short_refresh_secs),
            ("chart.long_refresh_secs", self.long_refresh_secs),
        ];

        for (name, value) in fields {
            if value == 0 {
                return Err(CoreError::Config(format!("{}는 0보다 커야 합니다", name)));
            }
        }
        Ok(())
    }
}

/// 시세 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceConfig {
    /// 장중 시세 캐시 TTL (초, 기본: 5분)
    pub regular_ttl_secs: u64,
    /// 야간 시세 캐시 TTL (초, 기본: 12시간)
    pub overnight_ttl_secs: u64,
    /// 시세 API 기본 URL
    pub quote_base_url: String,
    /// 시세 API 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            regular_ttl_secs: 5 * 60,
            overnight_ttl_secs: 12 * 60 * 60,
            quote_base_url: "https://query1.finance.yahoo.com".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl PriceConfig {
    /// 장중 TTL
    pub fn regular_ttl(&self) -> Duration {
        Duration::from_secs(self.regular_ttl_secs)
    }

    /// 야간 TTL
    pub fn overnight_ttl(&self) -> Duration {
        Duration::from_secs(self.overnight_ttl_secs)
    }

    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 공포/탐욕 지수 이미지 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// 캐시 TTL (초, 기본: 1시간)
    pub ttl_secs: u64,
    /// 주식 공포/탐욕 지수 페이지 (needleChart 이미지 추출)
    pub stock_page_url: String,
    /// 암호화폐 공포/탐욕 지수 이미지 (고정 URL)
    pub crypto_image_url: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60,
            stock_page_url: "https://money.cnn.com/data/fear-and-greed/".to_string(),
            crypto_image_url: "https://alternative.me/crypto/fear-and-greed-index.png"
                .to_string(),
        }
    }
}

impl SentimentConfig {
    /// 캐시 TTL
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드 (예: DASHBOARD__SERVER__PORT=9000)
            .add_source(
                config::Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 시작 전에 값 범위를 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        self.chart.validate()
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// `DASHBOARD_CONFIG` 환경 변수가 있으면 그 경로를 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path = std::env::var("DASHBOARD_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load(path)
    }
}
