use futures_util::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{info, warn};

use crate::models::banner::Banner;
use crate::services::metrics::EVENTS_PUBLISHED_COUNTER;
use crate::services::subscribers::SubscriberHub;

/// Delay before the relay re-subscribes after losing Redis.
const RELAY_RETRY_SECS: u64 = 5;

/// Publishes banner changes to the `banner_updated` topic.
///
/// With Redis the payload goes through PUBLISH and reaches local websockets
/// via [`start_relay`]; without it the payload is fanned out in-process.
#[derive(Clone)]
pub struct EventBus {
    channel: String,
    redis: Option<MultiplexedConnection>,
    hub: SubscriberHub,
}

impl EventBus {
    pub fn local(channel: impl Into<String>, hub: SubscriberHub) -> Self {
        Self {
            channel: channel.into(),
            redis: None,
            hub,
        }
    }

    pub fn redis(channel: impl Into<String>, conn: MultiplexedConnection, hub: SubscriberHub) -> Self {
        Self {
            channel: channel.into(),
            redis: Some(conn),
            hub,
        }
    }

    pub async fn publish(&self, banner: &Banner) -> anyhow::Result<()> {
        let payload = serde_json::to_string(banner)?;
        match &self.redis {
            Some(conn) => {
                let mut conn = conn.clone();
                conn.publish::<_, _, ()>(&self.channel, &payload).await?;
            }
            None => {
                self.hub.fan_out(&payload);
            }
        }
        EVENTS_PUBLISHED_COUNTER.inc();
        Ok(())
    }
}

/// Spawn the single Redis subscription that feeds every local websocket.
pub fn start_relay(client: redis::Client, channel: String, hub: SubscriberHub) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = relay(&client, &channel, &hub).await {
                warn!("Banner relay: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(RELAY_RETRY_SECS)).await;
        }
    });
}

async fn relay(client: &redis::Client, channel: &str, hub: &SubscriberHub) -> anyhow::Result<()> {
    let mut pubsub = client.get_async_pubsub().await?;
    pubsub.subscribe(channel).await?;
    info!("Banner relay subscribed to {}", channel);

    let mut stream = pubsub.on_message();
    while let Some(msg) = stream.next().await {
        let payload: String = match msg.get_payload() {
            Ok(p) => p,
            Err(_) => continue,
        };
        let delivered = hub.fan_out(&payload);
        tracing::debug!("Relayed banner event to {} subscribers", delivered);
    }

    anyhow::bail!("subscription to {} closed", channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_publish_reaches_hub() {
        let hub = SubscriberHub::new();
        let mut sub = hub.subscribe();
        let bus = EventBus::local("banner_updated", hub);

        let mut banner = Banner::empty("sparky");
        banner.message = "hello".into();
        bus.publish(&banner).await.unwrap();

        let payload = sub.receiver.try_recv().unwrap();
        let received: Banner = serde_json::from_str(&payload).unwrap();
        assert_eq!(received, banner);
    }
}
