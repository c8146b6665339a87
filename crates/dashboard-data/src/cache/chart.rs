//! 차트 이미지 캐시 엔진.
//!
//! 요청된 차트를 디스크에 생성하고 메타데이터를 보관합니다.
//!
//! # 동작
//!
//! - 명시적 요청은 캐시 적중 여부와 관계없이 항상 다시 생성하고 보관 기간(기본 2일)을
//!   새로 시작합니다.
//! - 백그라운드 루프는 두 주기로 캐시된 차트를 갱신합니다:
//!   - 짧은 주기(15분): 분봉 차트를 항목별 태스크로 분리 실행 (완료를 기다리지 않음).
//!     이전 틱의 갱신이 아직 실행 중인 항목은 건너뜁니다.
//!   - 긴 주기(30분): 나머지 차트를 순차 갱신 (틱 안에서 완료)
//! - 장 마감(`Closed`) 중에는 두 틱 모두 아무것도 하지 않습니다.
//! - 갱신은 보관 기간을 연장하지 않으므로 더 이상 요청되지 않는 차트는 2일 후 사라집니다.
//!
//! 파일은 같은 디렉토리의 임시 파일에 생성한 뒤 최종 경로로 rename 하므로
//! 읽는 쪽은 항상 완성된 파일만 봅니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashboard_core::{ChartConfig, ChartKey, RefreshClass, SessionSource};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::store::TtlStore;
use crate::error::{DataError, Result};
use crate::provider::ChartGenerator;

/// 차트 캐시 설정.
#[derive(Debug, Clone)]
pub struct ChartCacheConfig {
    /// 차트 파일 디렉토리
    pub output_dir: PathBuf,
    /// 명시적 요청 후 보관 기간
    pub retention: Duration,
    /// 분봉 갱신 주기
    pub short_refresh: Duration,
    /// 일봉 이상 갱신 주기
    pub long_refresh: Duration,
}

impl Default for ChartCacheConfig {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for ChartCacheConfig {
    fn from(config: &ChartConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            retention: config.retention(),
            short_refresh: config.short_refresh(),
            long_refresh: config.long_refresh(),
        }
    }
}

/// 캐시된 차트 메타데이터.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub key: ChartKey,
    /// 차트 파일 경로
    pub path: PathBuf,
    /// 마지막 생성 시각
    pub generated_at: DateTime<Utc>,
}

/// 갱신 틱 통계.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    /// 장 마감으로 틱을 건너뜀
    pub session_closed: bool,
    /// 순차 갱신 시도 수
    pub attempted: usize,
    /// 갱신 성공
    pub succeeded: usize,
    /// 갱신 실패
    pub failed: usize,
    /// 백그라운드 태스크로 분리 실행한 수
    pub dispatched: usize,
    /// 장 마감으로 건너뛴 항목 수
    pub skipped: usize,
    /// 이전 갱신이 진행 중이라 건너뛴 항목 수
    pub in_flight: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RefreshStats {
    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        if self.session_closed {
            debug!(operation, skipped = self.skipped, "장 마감, 차트 갱신 건너뜀");
            return;
        }

        info!(
            operation,
            attempted = self.attempted,
            succeeded = self.succeeded,
            failed = self.failed,
            dispatched = self.dispatched,
            in_flight = self.in_flight,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "차트 갱신 완료"
        );
    }
}

struct ChartEngine {
    config: ChartCacheConfig,
    store: TtlStore<String, ChartEntry>,
    generator: Arc<dyn ChartGenerator>,
    session: Arc<dyn SessionSource>,
    /// 분리 실행 중인 분봉 갱신 (파일명)
    in_flight: Mutex<HashSet<String>>,
}

impl ChartEngine {
    fn final_path(&self, key: &ChartKey) -> PathBuf {
        self.config.output_dir.join(key.file_name())
    }

    /// 임시 파일에 생성 후 최종 경로로 교체합니다.
    ///
    /// 임시 파일은 숨김 파일이며 확장자는 `.png`를 유지합니다.
    async fn regenerate(&self, key: &ChartKey) -> Result<ChartEntry> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let final_path = self.final_path(key);
        let file_name = key.file_name();
        let stem = file_name.trim_end_matches(".png");
        let temp_path = self
            .config
            .output_dir
            .join(format!(".{}.{}.png", stem, uuid::Uuid::new_v4().simple()));

        if let Err(e) = self.generator.generate(key, &temp_path).await {
            discard(&temp_path).await;
            return Err(e);
        }

        if tokio::fs::metadata(&temp_path).await.is_err() {
            return Err(DataError::Generation {
                key: key.to_string(),
                message: "생성기가 파일을 만들지 않음".to_string(),
            });
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            discard(&temp_path).await;
            return Err(e.into());
        }

        Ok(ChartEntry {
            key: key.clone(),
            path: final_path,
            generated_at: Utc::now(),
        })
    }

    /// 항목을 다시 생성하고 값만 교체합니다 (만료 시각 유지).
    async fn refresh_entry(&self, name: &str, key: &ChartKey) -> Result<()> {
        let entry = self.regenerate(key).await?;
        if !self.store.replace_value(&name.to_string(), entry).await {
            debug!(key = %key, "갱신 중 항목 만료됨");
        }
        Ok(())
    }

    /// 틱 시작 공통 처리: 만료 항목 제거 후 세션 확인.
    ///
    /// 장 마감이면 `None`과 함께 통계를 반환합니다.
    async fn begin_tick(
        &self,
        class: RefreshClass,
    ) -> (RefreshStats, Option<Vec<(String, ChartKey)>>) {
        self.store.purge_expired().await;
        let mut stats = RefreshStats::default();

        let targets: Vec<(String, ChartKey)> = self
            .store
            .snapshot()
            .await
            .into_iter()
            .filter(|(_, entry)| entry.key.refresh_class() == class)
            .map(|(name, entry)| (name, entry.key))
            .collect();

        if self.session.current_session().is_closed() {
            stats.session_closed = true;
            stats.skipped = targets.len();
            return (stats, None);
        }

        (stats, Some(targets))
    }

    async fn refresh_short(self: &Arc<Self>) -> RefreshStats {
        let started = Instant::now();
        let (mut stats, targets) = self.begin_tick(RefreshClass::Short).await;

        for (name, key) in targets.unwrap_or_default() {
            if !self.in_flight.lock().await.insert(name.clone()) {
                debug!(key = %key, "이전 분봉 갱신 진행 중, 건너뜀");
                stats.in_flight += 1;
                continue;
            }

            let engine = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = engine.refresh_entry(&name, &key).await {
                    warn!(key = %key, error = %e, "분봉 차트 갱신 실패");
                }
                engine.in_flight.lock().await.remove(&name);
            });
            stats.dispatched += 1;
        }

        stats.elapsed = started.elapsed();
        stats
    }

    async fn refresh_long(&self) -> RefreshStats {
        let started = Instant::now();
        let (mut stats, targets) = self.begin_tick(RefreshClass::Long).await;

        for (name, key) in targets.unwrap_or_default() {
            stats.attempted += 1;
            match self.refresh_entry(&name, &key).await {
                Ok(()) => stats.succeeded += 1,
                Err(e) => {
                    stats.failed += 1;
                    warn!(key = %key, error = %e, "차트 갱신 실패");
                }
            }
        }

        stats.elapsed = started.elapsed();
        stats
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "임시 차트 파일 삭제 실패");
        }
    }
}

/// 차트 캐시 엔진.
pub struct ChartCache {
    engine: Arc<ChartEngine>,
    shutdown_token: CancellationToken,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChartCache {
    /// 엔진을 생성하고 백그라운드 갱신 루프를 시작합니다.
    ///
    /// tokio 런타임 안에서 호출해야 합니다.
    pub fn new(
        config: ChartCacheConfig,
        generator: Arc<dyn ChartGenerator>,
        session: Arc<dyn SessionSource>,
    ) -> Self {
        let mut cache = Self::without_refresh(config, generator, session);
        let handle = spawn_refresh_loop(Arc::clone(&cache.engine), cache.shutdown_token.clone());
        cache.refresh_task = Mutex::new(Some(handle));
        cache
    }

    /// 백그라운드 갱신 없이 엔진을 생성합니다.
    pub fn without_refresh(
        config: ChartCacheConfig,
        generator: Arc<dyn ChartGenerator>,
        session: Arc<dyn SessionSource>,
    ) -> Self {
        let store = TtlStore::new(Some(config.retention));
        Self {
            engine: Arc::new(ChartEngine {
                config,
                store,
                generator,
                session,
                in_flight: Mutex::new(HashSet::new()),
            }),
            shutdown_token: CancellationToken::new(),
            refresh_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ChartCacheConfig {
        &self.engine.config
    }

    /// 차트를 요청합니다.
    ///
    /// 캐시 적중이어도 항상 다시 생성하며, 성공하면 보관 기간을 새로 시작합니다.
    /// 생성에 실패하면 항목을 쓰지 않습니다.
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn request(&self, key: &ChartKey) -> Result<ChartEntry> {
        let entry = self.engine.regenerate(key).await.map_err(|e| {
            error!(error = %e, "차트 생성 실패");
            e
        })?;

        self.engine
            .store
            .set_default(key.file_name(), entry.clone())
            .await;

        info!(path = %entry.path.display(), "차트 생성 완료");
        Ok(entry)
    }

    /// 문자열 토큰으로 차트를 요청합니다.
    pub async fn request_chart(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<ChartEntry> {
        let key = ChartKey::parse(symbol, period, interval)?;
        self.request(&key).await
    }

    /// 차트를 요청하고 파일 내용을 반환합니다.
    pub async fn chart_bytes(&self, symbol: &str, period: &str, interval: &str) -> Result<Vec<u8>> {
        let key = ChartKey::parse(symbol, period, interval)?;
        self.request(&key).await?;

        let entry = self
            .engine
            .store
            .get(&key.file_name())
            .await
            .ok_or_else(|| DataError::NotFound(format!("차트 캐시 없음: {}", key)))?;

        Ok(tokio::fs::read(&entry.path).await?)
    }

    /// 캐시 항목 조회 (생성하지 않음).
    pub async fn get(&self, key: &ChartKey) -> Option<ChartEntry> {
        self.engine.store.get(&key.file_name()).await
    }

    /// 짧은 주기 틱: 분봉 차트를 분리된 태스크로 갱신합니다.
    pub async fn refresh_short_intervals(&self) -> RefreshStats {
        self.engine.refresh_short().await
    }

    /// 긴 주기 틱: 나머지 차트를 순차 갱신합니다.
    pub async fn refresh_long_intervals(&self) -> RefreshStats {
        self.engine.refresh_long().await
    }

    /// 만료되지 않은 항목 수.
    pub async fn len(&self) -> usize {
        self.engine.store.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 현재 항목 목록 (파일명 순).
    pub async fn entries(&self) -> Vec<ChartEntry> {
        let mut entries = self.engine.store.snapshot().await;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// 갱신 루프를 멈추고 캐시를 비웁니다.
    ///
    /// 여러 번 호출해도 안전합니다. 이미 분리 실행된 갱신 태스크는 취소하지 않습니다.
    pub async fn shutdown(&self) {
        self.shutdown_token.cancel();

        let handle = self.refresh_task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "차트 갱신 루프 종료 실패");
            }
        }

        self.engine.store.flush().await;
        info!("차트 캐시 종료");
    }
}

impl Drop for ChartCache {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

fn spawn_refresh_loop(
    engine: Arc<ChartEngine>,
    shutdown_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            short_secs = engine.config.short_refresh.as_secs(),
            long_secs = engine.config.long_refresh.as_secs(),
            "차트 갱신 루프 시작"
        );

        let mut short_tick = interval(engine.config.short_refresh);
        let mut long_tick = interval(engine.config.long_refresh);
        short_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        long_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // 첫 tick은 즉시 발생하므로 건너뜀
        short_tick.tick().await;
        long_tick.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_token.cancelled() => {
                    info!("차트 갱신 루프: 종료 시그널 수신");
                    break;
                }
                _ = short_tick.tick() => {
                    engine.refresh_short().await.log_summary("short");
                }
                _ = long_tick.tick() => {
                    engine.refresh_long().await.log_summary("long");
                }
            }
        }

        info!("차트 갱신 루프 종료됨");
    })
}
