use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::onboarding::steps::Step;

/// Per-step form values a user has entered but not necessarily saved.
#[derive(Debug, Clone, Default)]
pub struct DraftCache {
    drafts: HashMap<Step, Value>,
}

impl DraftCache {
    /// Seeds a draft for every step from a freshly normalized record.
    pub fn from_resume(record: &ResumeRecord) -> Self {
        let drafts = Step::SEQUENCE
            .into_iter()
            .map(|step| (step, step.extract(record)))
            .collect();
        Self { drafts }
    }

    pub fn update(&mut self, step: Step, values: Value) {
        self.drafts.insert(step, values);
    }

    pub fn get(&self, step: Step) -> Option<&Value> {
        self.drafts.get(&step)
    }

    /// The cached draft, or the step's defaults extracted from `record`.
    pub fn defaults_for(&self, step: Step, record: &ResumeRecord) -> Value {
        self.get(step)
            .cloned()
            .unwrap_or_else(|| step.extract(record))
    }

    /// Drafts keyed by step key, in a stable order.
    pub fn snapshot(&self) -> BTreeMap<&'static str, Value> {
        self.drafts
            .iter()
            .map(|(step, values)| (step.key(), values.clone()))
            .collect()
    }
}

type SharedDraftCache = Arc<RwLock<DraftCache>>;

const DEFAULT_MAX_USERS: u64 = 10_000;
const DEFAULT_IDLE: Duration = Duration::from_secs(60 * 60);

/// Draft caches for recently active users.
///
/// Bounded by user count and by idle time: a user's drafts are dropped once
/// they go untouched for the idle period, or when the store is full.
/// Concurrent writers for the same user: last write wins per step.
#[derive(Clone)]
pub struct DraftStore {
    inner: Cache<Uuid, SharedDraftCache>,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_USERS, DEFAULT_IDLE)
    }
}

impl DraftStore {
    pub fn new(max_users: u64, idle: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_users)
            .time_to_idle(idle)
            .build();
        Self { inner }
    }

    /// Throws away the user's drafts and rebuilds them from `record`.
    pub async fn reload(&self, user_id: Uuid, record: &ResumeRecord) -> BTreeMap<&'static str, Value> {
        let cache = DraftCache::from_resume(record);
        let snapshot = cache.snapshot();
        self.inner
            .insert(user_id, Arc::new(RwLock::new(cache)))
            .await;
        debug!(%user_id, steps = snapshot.len(), "Reloaded onboarding drafts");
        snapshot
    }

    pub async fn update(&self, user_id: Uuid, step: Step, values: Value) {
        let cache = self
            .inner
            .get_with(user_id, async { SharedDraftCache::default() })
            .await;
        cache.write().await.update(step, values);
        debug!(%user_id, %step, "Stored onboarding draft");
    }

    pub async fn get(&self, user_id: Uuid, step: Step) -> Option<Value> {
        let cache = self.inner.get(&user_id).await?;
        let drafts = cache.read().await;
        drafts.get(step).cloned()
    }

    pub async fn defaults_for(&self, user_id: Uuid, step: Step, record: &ResumeRecord) -> Value {
        match self.inner.get(&user_id).await {
            Some(cache) => cache.read().await.defaults_for(step, record),
            None => step.extract(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::defaults::merge_resume_defaults;
    use serde_json::json;

    fn record() -> ResumeRecord {
        merge_resume_defaults(Some(&json!({
            "subdomain": "dana",
            "profession": "Engineer",
            "theme": {"id": "ryancv", "mode": "dark"},
        })))
    }

    #[test]
    fn test_from_resume_seeds_every_step() {
        let cache = DraftCache::from_resume(&record());
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), Step::SEQUENCE.len());
        assert_eq!(snapshot["step_1"]["profession"], "Engineer");
        assert_eq!(snapshot["theme"]["theme"]["id"], "ryancv");
        assert_eq!(snapshot["logout"], json!({"subdomain": "dana"}));
    }

    #[test]
    fn test_update_overrides_extracted_defaults() {
        let record = record();
        let mut cache = DraftCache::default();
        assert_eq!(
            cache.defaults_for(Step::Profile, &record),
            Step::Profile.extract(&record)
        );

        cache.update(Step::Profile, json!({"profession": "Chef"}));
        assert_eq!(
            cache.defaults_for(Step::Profile, &record)["profession"],
            "Chef"
        );
        assert!(cache.get(Step::Skills).is_none());
    }

    #[tokio::test]
    async fn test_store_is_per_user() {
        let store = DraftStore::default();
        let (dana, lee) = (Uuid::new_v4(), Uuid::new_v4());

        store.update(dana, Step::Skills, json!({"knowledge": []})).await;
        assert_eq!(
            store.get(dana, Step::Skills).await,
            Some(json!({"knowledge": []}))
        );
        assert!(store.get(lee, Step::Skills).await.is_none());

        let defaults = store.defaults_for(lee, Step::Profile, &record()).await;
        assert_eq!(defaults["profession"], "Engineer");
    }

    #[tokio::test]
    async fn test_reload_discards_stale_drafts() {
        let store = DraftStore::default();
        let user = Uuid::new_v4();
        store.update(user, Step::Profile, json!({"profession": "Stale"})).await;

        let snapshot = store.reload(user, &record()).await;
        assert_eq!(snapshot["step_1"]["profession"], "Engineer");
        let draft = store.get(user, Step::Profile).await;
        assert_eq!(draft.map(|d| d["profession"].clone()), Some(json!("Engineer")));
    }

    #[tokio::test]
    async fn test_store_evicts_beyond_capacity() {
        let store = DraftStore::new(3, DEFAULT_IDLE);
        for _ in 0..20 {
            store
                .update(Uuid::new_v4(), Step::Profile, json!({"profession": "Chef"}))
                .await;
        }
        store.inner.run_pending_tasks().await;
        assert!(store.inner.entry_count() <= 3);
    }

    #[tokio::test]
    async fn test_idle_drafts_expire() {
        let store = DraftStore::new(10, Duration::from_millis(100));
        let user = Uuid::new_v4();
        store.update(user, Step::Profile, json!({"profession": "Chef"})).await;
        assert!(store.get(user, Step::Profile).await.is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(store.get(user, Step::Profile).await.is_none());
        let defaults = store.defaults_for(user, Step::Profile, &record()).await;
        assert_eq!(defaults["profession"], "Engineer");
    }
}
