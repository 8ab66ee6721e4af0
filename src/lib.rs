pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use tracing::info;

use config::Config;
use db::StateStore;
use services::events::{self, EventBus};
use services::registry::BannerRegistry;
use services::subscribers::SubscriberHub;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub banners: BannerRegistry,
    pub hub: SubscriberHub,
}

impl AppState {
    /// Wire store, event bus and registry, connecting to Redis when configured.
    pub async fn connect(config: Arc<Config>) -> anyhow::Result<Self> {
        let hub = SubscriberHub::new();

        let (store, events) = match &config.redis_url {
            Some(url) => {
                let (client, conn) = db::connect_redis(url).await?;
                info!("Redis connected");
                events::start_relay(client, config.pubsub_channel.clone(), hub.clone());
                (
                    StateStore::Redis(conn.clone()),
                    EventBus::redis(config.pubsub_channel.clone(), conn, hub.clone()),
                )
            }
            None => {
                info!("REDIS_URL not set, banner state and events kept in memory");
                (
                    StateStore::memory(),
                    EventBus::local(config.pubsub_channel.clone(), hub.clone()),
                )
            }
        };

        Ok(Self::with_parts(config, store, events, hub))
    }

    pub fn with_parts(
        config: Arc<Config>,
        store: StateStore,
        events: EventBus,
        hub: SubscriberHub,
    ) -> Self {
        let banners = BannerRegistry::new(
            config.banner_ids.clone(),
            store,
            events,
            config.banner_duration,
        );
        Self {
            config,
            banners,
            hub,
        }
    }

    /// Fully in-process state for `config`.
    pub fn in_memory(config: Config) -> Self {
        let hub = SubscriberHub::new();
        let events = EventBus::local(config.pubsub_channel.clone(), hub.clone());
        Self::with_parts(Arc::new(config), StateStore::memory(), events, hub)
    }
}
