use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::db::StateStore;
use crate::error::BannerError;
use crate::services::banner_actor::{self, BannerHandle};
use crate::services::events::EventBus;

/// Resolves banner ids to running actors, activating them on first access.
#[derive(Clone)]
pub struct BannerRegistry {
    ids: Arc<Vec<String>>,
    actors: Arc<Mutex<HashMap<String, BannerHandle>>>,
    store: StateStore,
    events: EventBus,
    duration: Duration,
}

impl BannerRegistry {
    pub fn new(ids: Vec<String>, store: StateStore, events: EventBus, duration: Duration) -> Self {
        Self {
            ids: Arc::new(ids),
            actors: Arc::new(Mutex::new(HashMap::new())),
            store,
            events,
            duration,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub async fn get(&self, id: &str) -> Result<BannerHandle, BannerError> {
        if !self.is_known(id) {
            return Err(BannerError::InvalidId);
        }

        let mut actors = self.actors.lock().await;
        if let Some(handle) = actors.get(id).filter(|h| h.is_alive()) {
            return Ok(handle.clone());
        }

        let handle =
            banner_actor::activate(id, self.store.clone(), self.events.clone(), self.duration)
                .await?;
        actors.insert(id.to_string(), handle.clone());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::banner::UpdateBanner;
    use crate::services::subscribers::SubscriberHub;

    fn registry(store: StateStore) -> BannerRegistry {
        let events = EventBus::local("banner_updated", SubscriberHub::new());
        BannerRegistry::new(
            vec!["lightning".into(), "sparky".into()],
            store,
            events,
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_unknown_id_rejected_without_mutation() {
        let store = StateStore::memory();
        let registry = registry(store.clone());

        assert!(matches!(registry.get("thunder").await, Err(BannerError::InvalidId)));
        assert!(store.load("thunder").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_actor_is_reused() {
        let registry = registry(StateStore::memory());
        let update = UpdateBanner {
            icon: None,
            message: Some("hello".into()),
        };

        registry.get("sparky").await.unwrap().update(update).await.unwrap();
        let banner = registry.get("sparky").await.unwrap().get().await.unwrap();
        assert_eq!(banner.message, "hello");
    }

    #[tokio::test]
    async fn test_banners_are_independent() {
        let registry = registry(StateStore::memory());
        let update = UpdateBanner {
            icon: None,
            message: Some("hello".into()),
        };

        registry.get("sparky").await.unwrap().update(update.clone()).await.unwrap();
        registry.get("lightning").await.unwrap().update(update).await.unwrap();
    }
}
