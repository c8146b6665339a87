//! 공포/탐욕 지수 이미지 소스.
//!
//! - **stock**: 공포/탐욕 지수 페이지의 `div#needleChart` 인라인 스타일
//!   `background-image:url('...')`에서 이미지 URL을 추출
//! - **crypto**: 고정 이미지 URL

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataError, Result};

/// 공포/탐욕 지수 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Stock,
    Crypto,
}

impl SentimentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Stock => "stock",
            SentimentCategory::Crypto => "crypto",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentCategory {
    type Err = DataError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "stock" => Ok(SentimentCategory::Stock),
            "crypto" => Ok(SentimentCategory::Crypto),
            other => Err(DataError::UnknownCategory(other.to_string())),
        }
    }
}

/// 공포/탐욕 지수 소스 트레잇.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    /// 분류의 현재 이미지 URL을 찾습니다.
    async fn resolve_url(&self, category: SentimentCategory) -> Result<String>;

    /// 이미지 바이트를 내려받습니다.
    async fn fetch_bytes(&self, category: SentimentCategory, url: &str) -> Result<Vec<u8>>;
}

/// `div#needleChart`의 스타일에서 이미지 URL을 추출합니다.
///
/// 스타일이 `background-image:url`로 시작하고 작은따옴표로 감싼 URL이
/// 정확히 하나 있을 때만 값을 반환합니다.
pub fn extract_needle_image_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("div#needleChart").ok()?;

    document.select(&selector).find_map(|node| {
        let style = node.value().attr("style")?.trim();
        if !style.starts_with("background-image:url") {
            return None;
        }
        let parts: Vec<&str> = style.split('\'').collect();
        match parts.as_slice() {
            [_, url, _] if !url.is_empty() => Some((*url).to_string()),
            _ => None,
        }
    })
}

/// 웹 기반 공포/탐욕 지수 소스.
#[derive(Debug, Clone)]
pub struct WebSentimentSource {
    client: Client,
    stock_page_url: String,
    crypto_image_url: String,
}

impl WebSentimentSource {
    pub fn new(
        stock_page_url: impl Into<String>,
        crypto_image_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            stock_page_url: stock_page_url.into(),
            crypto_image_url: crypto_image_url.into(),
        })
    }

    fn fetch_error(category: SentimentCategory, message: impl ToString) -> DataError {
        DataError::SentimentFetch {
            category: category.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl SentimentSource for WebSentimentSource {
    async fn resolve_url(&self, category: SentimentCategory) -> Result<String> {
        match category {
            SentimentCategory::Crypto => Ok(self.crypto_image_url.clone()),
            SentimentCategory::Stock => {
                let html = self
                    .client
                    .get(&self.stock_page_url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| Self::fetch_error(category, e))?
                    .text()
                    .await
                    .map_err(|e| Self::fetch_error(category, e))?;

                let url = extract_needle_image_url(&html).ok_or_else(|| {
                    Self::fetch_error(category, "needleChart 이미지를 찾을 수 없음")
                })?;

                debug!(category = %category, url = %url, "지수 이미지 URL 추출");
                Ok(url)
            }
        }
    }

    async fn fetch_bytes(&self, category: SentimentCategory, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::fetch_error(category, e))?
            .bytes()
            .await
            .map_err(|e| Self::fetch_error(category, e))?;

        Ok(bytes.to_vec())
    }
}
