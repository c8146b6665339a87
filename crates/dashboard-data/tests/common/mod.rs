//! 통합 테스트용 stub 구현.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashboard_core::{ChartKey, QuoteSnapshot, SessionSource, SessionState};
use dashboard_data::{
    ChartGenerator, DataError, QuoteProvider, Result, SentimentCategory, SentimentSource,
};
use rust_decimal::Decimal;

/// 바꿀 수 있는 고정 세션.
pub struct StubSession(Mutex<SessionState>);

impl StubSession {
    pub fn new(state: SessionState) -> Arc<Self> {
        Arc::new(Self(Mutex::new(state)))
    }

    pub fn set(&self, state: SessionState) {
        *self.0.lock().unwrap() = state;
    }
}

impl SessionSource for StubSession {
    fn current_session(&self) -> SessionState {
        *self.0.lock().unwrap()
    }
}

/// 호출을 기록하고 `{symbol}#{n}`을 파일에 쓰는 생성기.
#[derive(Default)]
pub struct StubGenerator {
    calls: Mutex<Vec<ChartKey>>,
    failing: Mutex<HashSet<String>>,
    skip_write: Mutex<bool>,
    delay: Mutex<Duration>,
}

impl StubGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<ChartKey> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn fail_symbol(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    pub fn recover_symbol(&self, symbol: &str) {
        self.failing.lock().unwrap().remove(symbol);
    }

    /// 성공 종료하지만 파일을 쓰지 않도록 설정.
    pub fn set_skip_write(&self, skip: bool) {
        *self.skip_write.lock().unwrap() = skip;
    }

    /// 파일을 쓰기 전에 기다릴 시간.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// 호출 수가 `expected`에 도달할 때까지 대기.
    ///
    /// 일시정지된 시계에서도 동작하도록 tokio 타이머 대신 실제 시간으로 기다립니다.
    pub async fn wait_for_calls(&self, expected: usize) {
        for _ in 0..5_000 {
            if self.call_count() >= expected {
                return;
            }
            tokio::task::yield_now().await;
            std::thread::sleep(Duration::from_millis(1));
        }
        panic!(
            "expected {} generator calls, observed {}",
            expected,
            self.call_count()
        );
    }
}

#[async_trait]
impl ChartGenerator for StubGenerator {
    async fn generate(&self, key: &ChartKey, path: &Path) -> Result<()> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(key.clone());
            calls.len()
        };

        if self.failing.lock().unwrap().contains(&key.symbol) {
            return Err(DataError::Generation {
                key: key.to_string(),
                message: "exit status: 1: No data found, symbol may be delisted".to_string(),
            });
        }

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if !*self.skip_write.lock().unwrap() {
            tokio::fs::write(path, format!("{}#{}", key.symbol, n)).await?;
        }
        Ok(())
    }
}

/// 호출 수를 세는 시세 제공자.
#[derive(Default)]
pub struct StubQuoteProvider {
    calls: AtomicUsize,
    failing: Mutex<HashSet<String>>,
    empty: Mutex<HashSet<String>>,
}

impl StubQuoteProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_symbol(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    pub fn recover_symbol(&self, symbol: &str) {
        self.failing.lock().unwrap().remove(symbol);
    }

    /// 결과 없는 응답을 돌려줄 심볼.
    pub fn empty_symbol(&self, symbol: &str) {
        self.empty.lock().unwrap().insert(symbol.to_string());
    }
}

#[async_trait]
impl QuoteProvider for StubQuoteProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.failing.lock().unwrap().contains(symbol) {
            return Err(DataError::QuoteFetch {
                symbol: symbol.to_string(),
                message: "HTTP 503 Service Unavailable".to_string(),
            });
        }

        if self.empty.lock().unwrap().contains(symbol) {
            return Ok(QuoteSnapshot::zeroed(symbol));
        }

        let mut quote = QuoteSnapshot::zeroed(symbol);
        quote.name = format!("{} Inc.", symbol);
        quote.price = Decimal::from(100 + n as i64);
        quote.volume = 1_000 * n as i64;
        Ok(quote)
    }
}

/// 지수 이미지 stub.
#[derive(Default)]
pub struct StubSentimentSource {
    resolves: AtomicUsize,
    broken_page: Mutex<bool>,
}

impl StubSentimentSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn set_broken_page(&self, broken: bool) {
        *self.broken_page.lock().unwrap() = broken;
    }
}

#[async_trait]
impl SentimentSource for StubSentimentSource {
    async fn resolve_url(&self, category: SentimentCategory) -> Result<String> {
        let n = self.resolves.fetch_add(1, Ordering::SeqCst) + 1;
        match category {
            SentimentCategory::Crypto => {
                Ok("https://alternative.me/crypto/fear-and-greed-index.png".to_string())
            }
            SentimentCategory::Stock if *self.broken_page.lock().unwrap() => {
                Err(DataError::SentimentFetch {
                    category: category.to_string(),
                    message: "needleChart 이미지를 찾을 수 없음".to_string(),
                })
            }
            SentimentCategory::Stock => Ok(format!("https://example.test/needle-{}.png", n)),
        }
    }

    async fn fetch_bytes(&self, _category: SentimentCategory, url: &str) -> Result<Vec<u8>> {
        Ok(url.as_bytes().to_vec())
    }
}
