//! 만료 시간을 가진 키-값 저장소.
//!
//! `moka::future::Cache` 위에 항목별 만료를 얹습니다. 각 항목은 저장할 때
//! 정한 TTL(기본 TTL 또는 명시적 TTL)을 가지며, `replace_value`로 바꾼 값은
//! 기존 만료 시각을 그대로 이어받습니다.

use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use moka::Expiry;

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    /// `None`이면 만료되지 않음
    ttl: Option<Duration>,
    /// 갱신 시 기존 만료 시각 유지
    keep_expiry: bool,
}

/// 항목별 TTL을 적용하는 만료 정책.
struct SlotExpiry;

impl<K, V> Expiry<K, Slot<V>> for SlotExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        slot: &Slot<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        slot.ttl
    }

    fn expire_after_update(
        &self,
        _key: &K,
        slot: &Slot<V>,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if slot.keep_expiry {
            duration_until_expiry
        } else {
            slot.ttl
        }
    }
}

/// TTL 저장소.
pub struct TtlStore<K, V> {
    cache: Cache<K, Slot<V>>,
    default_ttl: Option<Duration>,
}

impl<K, V> TtlStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// 기본 만료 시간으로 저장소를 생성합니다. `None`이면 기본 만료가 없습니다.
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            cache: Cache::builder().expire_after(SlotExpiry).build(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// 만료되지 않은 값을 조회합니다.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key).await.map(|slot| slot.value)
    }

    /// 기본 만료 시간으로 저장합니다. 기존 항목은 교체되고 만료가 새로 시작됩니다.
    pub async fn set_default(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// 명시적 만료 시간으로 저장합니다.
    pub async fn set_with_ttl(&self, key: K, value: V, ttl: Option<Duration>) {
        let slot = Slot {
            value,
            ttl,
            keep_expiry: false,
        };
        self.cache.insert(key, slot).await;
    }

    /// 기존 만료 시각을 유지한 채 값만 교체합니다.
    ///
    /// 항목이 없거나 이미 만료되었으면 `false`를 반환하고 아무것도 쓰지 않습니다.
    pub async fn replace_value(&self, key: &K, value: V) -> bool {
        let result = self
            .cache
            .entry(key.clone())
            .and_compute_with(|current| {
                let op = match current {
                    Some(_) => Op::Put(Slot {
                        value,
                        ttl: None,
                        keep_expiry: true,
                    }),
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        matches!(result, CompResult::ReplacedWith(_))
    }

    /// 모든 항목을 제거합니다.
    pub async fn flush(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// 만료된 항목을 정리합니다.
    pub async fn purge_expired(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// 만료되지 않은 항목 수.
    pub async fn len(&self) -> usize {
        self.cache.iter().count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 만료되지 않은 항목의 복사본.
    pub async fn snapshot(&self) -> Vec<(K, V)> {
        self.cache
            .iter()
            .map(|(key, slot)| ((*key).clone(), slot.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(400);

    #[tokio::test]
    async fn test_default_ttl_expiry() {
        let store: TtlStore<String, u32> = TtlStore::new(Some(TTL));
        store.set_default("AAPL".to_string(), 1).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.get(&"AAPL".to_string()).await, Some(1));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.get(&"AAPL".to_string()).await, None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_no_default_ttl_never_expires() {
        let store: TtlStore<&'static str, u32> = TtlStore::new(None);
        store.set_default("k", 7).await;
        store.set_with_ttl("short", 8, Some(Duration::from_millis(50))).await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.get(&"k").await, Some(7));
        assert_eq!(store.get(&"short").await, None);
    }

    #[tokio::test]
    async fn test_replace_value_keeps_expiry() {
        let store: TtlStore<&'static str, u32> = TtlStore::new(Some(TTL));
        store.set_default("k", 1).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(store.replace_value(&"k", 2).await);
        assert_eq!(store.get(&"k").await, Some(2));

        // 교체 후 TTL이 새로 시작됐다면 650ms까지 살아 있어야 함
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(store.get(&"k").await, None);
        assert!(!store.replace_value(&"k", 3).await);
        assert_eq!(store.get(&"k").await, None);
    }

    #[tokio::test]
    async fn test_set_default_restarts_expiry() {
        let store: TtlStore<&'static str, u32> = TtlStore::new(Some(TTL));
        store.set_default("k", 1).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        store.set_default("k", 2).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(store.get(&"k").await, Some(2));
    }

    #[tokio::test]
    async fn test_replace_missing_key() {
        let store: TtlStore<&'static str, u32> = TtlStore::new(Some(TTL));
        assert!(!store.replace_value(&"missing", 1).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_snapshot_skips_expired() {
        let store: TtlStore<&'static str, u32> = TtlStore::new(Some(Duration::from_millis(50)));
        store.set_default("short", 1).await;
        store
            .set_with_ttl("long", 2, Some(Duration::from_secs(60)))
            .await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        store.purge_expired().await;
        assert_eq!(store.snapshot().await, vec![("long", 2)]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_flush_is_idempotent() {
        let store: TtlStore<&'static str, u32> = TtlStore::new(None);
        store.set_default("a", 1).await;
        store.set_default("b", 2).await;

        store.flush().await;
        store.flush().await;
        assert!(store.is_empty().await);
        assert_eq!(store.get(&"a").await, None);
    }
}
