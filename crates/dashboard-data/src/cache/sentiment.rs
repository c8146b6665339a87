//! 공포/탐욕 지수 이미지 캐시.
//!
//! 분류(stock, crypto)마다 이미지 URL 하나를 1시간 보관합니다.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use super::store::TtlStore;
use crate::error::Result;
use crate::provider::{SentimentCategory, SentimentSource};

/// 공포/탐욕 지수 캐시.
pub struct SentimentCache {
    store: TtlStore<SentimentCategory, String>,
    source: Arc<dyn SentimentSource>,
}

impl SentimentCache {
    pub fn new(ttl: Duration, source: Arc<dyn SentimentSource>) -> Self {
        Self {
            store: TtlStore::new(Some(ttl)),
            source,
        }
    }

    /// 분류 이름으로 이미지 URL을 조회합니다.
    ///
    /// 알 수 없는 이름은 `DataError::UnknownCategory`.
    pub async fn snapshot_url(&self, name: &str) -> Result<String> {
        self.url_for(name.parse()?).await
    }

    #[instrument(skip(self))]
    pub async fn url_for(&self, category: SentimentCategory) -> Result<String> {
        if let Some(url) = self.store.get(&category).await {
            debug!("지수 이미지 캐시 적중");
            return Ok(url);
        }

        let url = self.source.resolve_url(category).await?;
        self.store.set_default(category, url.clone()).await;
        Ok(url)
    }

    /// 이미지 URL을 찾아 바이트를 내려받습니다.
    pub async fn snapshot_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let category: SentimentCategory = name.parse()?;
        let url = self.url_for(category).await?;
        self.source.fetch_bytes(category, &url).await
    }

    pub async fn shutdown(&self) {
        self.store.flush().await;
    }
}
