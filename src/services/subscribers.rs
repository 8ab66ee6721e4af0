use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::services::metrics::WS_SUBSCRIBERS_GAUGE;

/// Live websocket clients waiting for banner payloads.
///
/// Fan-out walks the list and drops every subscriber whose channel is closed,
/// so sockets that went away without unsubscribing are cleaned up on the
/// next event.
#[derive(Clone, Default)]
pub struct SubscriberHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, mpsc::UnboundedSender<String>)>,
}

pub struct Subscription {
    pub id: u64,
    pub receiver: mpsc::UnboundedReceiver<String>,
}

impl SubscriberHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push((id, tx));
        WS_SUBSCRIBERS_GAUGE.set(inner.subscribers.len() as f64);
        Subscription { id, receiver: rx }
    }

    pub fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        WS_SUBSCRIBERS_GAUGE.set(inner.subscribers.len() as f64);
    }

    /// Sends `payload` to every subscriber and returns how many received it.
    pub fn fan_out(&self, payload: &str) -> usize {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.retain(|(id, tx)| match tx.send(payload.to_string()) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Dropping closed websocket subscriber {}", id);
                false
            }
        });
        WS_SUBSCRIBERS_GAUGE.set(inner.subscribers.len() as f64);
        inner.subscribers.len()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_reaches_every_subscriber() {
        let hub = SubscriberHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_ne!(a.id, b.id);

        assert_eq!(hub.fan_out("payload"), 2);
        assert_eq!(a.receiver.try_recv().unwrap(), "payload");
        assert_eq!(b.receiver.try_recv().unwrap(), "payload");
    }

    #[test]
    fn test_fan_out_drops_closed_subscribers() {
        let hub = SubscriberHub::new();
        let mut alive = hub.subscribe();
        let gone = hub.subscribe();
        drop(gone);

        assert_eq!(hub.fan_out("first"), 1);
        assert_eq!(hub.len(), 1);
        assert_eq!(alive.receiver.try_recv().unwrap(), "first");
    }

    #[test]
    fn test_unsubscribe() {
        let hub = SubscriberHub::new();
        let sub = hub.subscribe();
        hub.unsubscribe(sub.id);
        assert!(hub.is_empty());
        assert_eq!(hub.fan_out("nobody"), 0);
    }
}
