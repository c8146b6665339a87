//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 캐시 엔진은 명시적으로 생성되어 `Arc`로 공유됩니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard_core::{AppConfig, SessionClassifier, SessionSource};
use dashboard_data::{
    ChartCache, ChartCacheConfig, PriceCache, PriceCacheConfig, Result, ScriptChartGenerator,
    SentimentCache, WebSentimentSource, YahooQuoteProvider,
};
use tracing::info;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 세션 분류기 (시간대 변환용)
    pub classifier: Arc<SessionClassifier>,
    /// 현재 세션 조회
    pub session: Arc<dyn SessionSource>,
    /// 차트 이미지 캐시
    pub charts: Arc<ChartCache>,
    /// 시세 캐시
    pub prices: Arc<PriceCache>,
    /// 공포/탐욕 지수 캐시
    pub sentiment: Arc<SentimentCache>,
    /// 서버 버전
    pub version: String,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 설정에서 분류기, 제공자, 캐시 엔진을 생성합니다.
    ///
    /// 차트 갱신 루프를 시작하므로 tokio 런타임 안에서 호출해야 합니다.
    ///
    /// # Errors
    /// 시간대/세션 경계나 차트 주기가 잘못되었거나 HTTP 클라이언트를 만들 수 없으면 에러.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let classifier = Arc::new(SessionClassifier::new(&config.session)?);
        let session: Arc<dyn SessionSource> = classifier.clone();

        let generator = Arc::new(ScriptChartGenerator::new(&config.chart.generator_bin));
        let charts = ChartCache::new(
            ChartCacheConfig::from(&config.chart),
            generator,
            session.clone(),
        );

        let quote_provider = Arc::new(YahooQuoteProvider::new(
            config.price.quote_base_url.clone(),
            config.price.request_timeout(),
        )?);
        let prices = PriceCache::new(
            PriceCacheConfig::from(&config.price),
            quote_provider,
            session.clone(),
        );

        let sentiment_source = Arc::new(WebSentimentSource::new(
            config.sentiment.stock_page_url.clone(),
            config.sentiment.crypto_image_url.clone(),
            config.price.request_timeout(),
        )?);
        let sentiment = SentimentCache::new(config.sentiment.ttl(), sentiment_source);

        info!(
            generator = %config.chart.generator_bin.display(),
            output_dir = %config.chart.output_dir.display(),
            timezone = %classifier.reference_tz(),
            "캐시 엔진 초기화 완료"
        );

        Ok(Self {
            classifier,
            session,
            charts: Arc::new(charts),
            prices: Arc::new(prices),
            sentiment: Arc::new(sentiment),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        })
    }

    /// 갱신 루프를 멈추고 모든 캐시를 비웁니다.
    pub async fn shutdown(&self) {
        self.charts.shutdown().await;
        self.prices.shutdown().await;
        self.sentiment.shutdown().await;
        info!("모든 캐시 엔진 종료");
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    //! 라우트 테스트용 stub과 상태 생성 헬퍼.

    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use dashboard_core::{ChartKey, QuoteSnapshot, SessionConfig, SessionState};
    use dashboard_data::{
        ChartGenerator, DataError, QuoteProvider, SentimentCategory, SentimentSource,
    };
    use rust_decimal_macros::dec;

    use super::*;

    pub struct FixedSession(pub Mutex<SessionState>);

    impl SessionSource for FixedSession {
        fn current_session(&self) -> SessionState {
            *self.0.lock().unwrap()
        }
    }

    /// `DELISTED` 심볼은 실패, 나머지는 `PNG:{symbol}`을 씀.
    pub struct FakeGenerator;

    #[async_trait]
    impl ChartGenerator for FakeGenerator {
        async fn generate(&self, key: &ChartKey, path: &Path) -> Result<()> {
            if key.symbol == "DELISTED" {
                return Err(DataError::Generation {
                    key: key.to_string(),
                    message: "exit status: 1".to_string(),
                });
            }
            tokio::fs::write(path, format!("PNG:{}", key.symbol)).await?;
            Ok(())
        }
    }

    /// `DOWN` 심볼은 실패, `TWTR`는 결과 없음.
    pub struct FakeQuotes;

    #[async_trait]
    impl QuoteProvider for FakeQuotes {
        async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
            match symbol {
                "DOWN" => Err(DataError::QuoteFetch {
                    symbol: symbol.to_string(),
                    message: "HTTP 503".to_string(),
                }),
                "TWTR" => Ok(QuoteSnapshot::zeroed(symbol)),
                _ => {
                    let mut quote = QuoteSnapshot::zeroed(symbol);
                    quote.name = format!("{} Corp", symbol);
                    quote.price = dec!(1234.5);
                    quote.change = dec!(-12.25);
                    quote.change_percent = -0.0098;
                    Ok(quote)
                }
            }
        }
    }

    pub struct FakeSentiment;

    #[async_trait]
    impl SentimentSource for FakeSentiment {
        async fn resolve_url(&self, category: SentimentCategory) -> Result<String> {
            Ok(format!("https://example.test/{}.png", category))
        }

        async fn fetch_bytes(&self, _category: SentimentCategory, url: &str) -> Result<Vec<u8>> {
            Ok(url.as_bytes().to_vec())
        }
    }

    /// 외부 의존성 없는 테스트용 AppState.
    pub fn create_test_state(output_dir: &Path, session: SessionState) -> AppState {
        let classifier = Arc::new(SessionClassifier::new(&SessionConfig::default()).unwrap());
        let session: Arc<dyn SessionSource> = Arc::new(FixedSession(Mutex::new(session)));

        let charts = ChartCache::without_refresh(
            ChartCacheConfig {
                output_dir: output_dir.to_path_buf(),
                ..Default::default()
            },
            Arc::new(FakeGenerator),
            session.clone(),
        );
        let prices = PriceCache::new(
            PriceCacheConfig::default(),
            Arc::new(FakeQuotes),
            session.clone(),
        );
        let sentiment = SentimentCache::new(Duration::from_secs(3600), Arc::new(FakeSentiment));

        AppState {
            classifier,
            session,
            charts: Arc::new(charts),
            prices: Arc::new(prices),
            sentiment: Arc::new(sentiment),
            version: "test".to_string(),
            started_at: Utc::now(),
        }
    }
}
