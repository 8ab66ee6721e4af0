//! One task per banner id.
//!
//! The task owns the banner state and its expiry deadline. Commands arrive
//! over an mpsc inbox and the deadline is polled in the same `select!`, so an
//! update and a clear for the same banner never interleave.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::db::StateStore;
use crate::error::BannerError;
use crate::models::banner::{Banner, UpdateBanner};
use crate::services::events::EventBus;
use crate::services::metrics::{BANNER_EXPIRIES_COUNTER, BANNER_UPDATES_COUNTER};

const INBOX_CAPACITY: usize = 32;

enum Command {
    Get(oneshot::Sender<Banner>),
    Update(UpdateBanner, oneshot::Sender<Result<Banner, BannerError>>),
}

/// Cloneable address of a running banner actor.
#[derive(Clone)]
pub struct BannerHandle {
    id: String,
    tx: mpsc::Sender<Command>,
}

impl BannerHandle {
    pub fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    pub async fn get(&self) -> Result<Banner, BannerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Get(reply)).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    pub async fn update(&self, update: UpdateBanner) -> Result<Banner, BannerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Update(update, reply)).await?;
        rx.await.map_err(|_| self.unavailable())?
    }

    async fn send(&self, cmd: Command) -> Result<(), BannerError> {
        self.tx.send(cmd).await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> BannerError {
        BannerError::Unavailable(self.id.clone())
    }
}

struct BannerActor {
    banner: Banner,
    store: StateStore,
    events: EventBus,
    duration: Duration,
    expiry: chrono::Duration,
    deadline: Option<Instant>,
}

/// Load (or create) the state of banner `id` and spawn its task.
pub async fn activate(
    id: &str,
    store: StateStore,
    events: EventBus,
    duration: Duration,
) -> anyhow::Result<BannerHandle> {
    let expiry = chrono::Duration::from_std(duration)?;

    let banner = match store.load(id).await? {
        Some(banner) => banner,
        None => {
            let banner = Banner::empty(id);
            store.save(&banner).await?;
            banner
        }
    };
    info!("Activated banner {} (active={})", id, banner.is_active());

    let deadline = resume_deadline(&banner, duration);
    let actor = BannerActor {
        banner,
        store,
        events,
        duration,
        expiry,
        deadline,
    };

    let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
    tokio::spawn(actor.run(rx));

    Ok(BannerHandle {
        id: id.to_string(),
        tx,
    })
}

/// Expiry for a banner loaded from the store: the stored `expires` instant,
/// or right away if that has already passed.
fn resume_deadline(banner: &Banner, duration: Duration) -> Option<Instant> {
    if !banner.is_active() {
        return None;
    }
    let remaining = match banner.expires {
        Some(expires) => (expires - Utc::now()).to_std().unwrap_or(Duration::ZERO),
        None => duration,
    };
    let now = Instant::now();
    Some(now.checked_add(remaining).unwrap_or(now))
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl BannerActor {
    async fn run(mut self, mut inbox: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                cmd = inbox.recv() => match cmd {
                    Some(Command::Get(reply)) => {
                        let _ = reply.send(self.banner.clone());
                    }
                    Some(Command::Update(update, reply)) => {
                        let result = self.update(update).await;
                        let _ = reply.send(result);
                    }
                    None => break,
                },
                _ = sleep_until(self.deadline) => self.clear().await,
            }
        }
        info!("Banner {} deactivated", self.banner.id);
    }

    async fn update(&mut self, update: UpdateBanner) -> Result<Banner, BannerError> {
        if self.banner.is_active() {
            BANNER_UPDATES_COUNTER
                .with_label_values(&[self.banner.id.as_str(), "conflict"])
                .inc();
            info!("Rejected update of active banner {}", self.banner.id);
            return Err(BannerError::Conflict);
        }

        let mut next = self.banner.clone();
        next.apply(&update);
        let (expires, deadline) = if next.is_active() {
            let expires = Utc::now()
                .checked_add_signed(self.expiry)
                .ok_or_else(|| anyhow::anyhow!("Banner expiry out of range"))?;
            let deadline = Instant::now()
                .checked_add(self.duration)
                .ok_or_else(|| anyhow::anyhow!("Banner expiry out of range"))?;
            (Some(expires), Some(deadline))
        } else {
            (None, None)
        };
        next.expires = expires;

        self.store.save(&next).await?;
        self.banner = next;
        self.deadline = deadline;

        BANNER_UPDATES_COUNTER
            .with_label_values(&[self.banner.id.as_str(), "accepted"])
            .inc();
        info!("Banner {} updated: {:?}", self.banner.id, self.banner.message);

        self.publish().await;
        Ok(self.banner.clone())
    }

    async fn clear(&mut self) {
        self.deadline = None;
        if !self.banner.is_active() {
            return;
        }

        self.banner = Banner::empty(self.banner.id.clone());
        if let Err(e) = self.store.save(&self.banner).await {
            error!("Failed to persist cleared banner {}: {}", self.banner.id, e);
        }

        BANNER_EXPIRIES_COUNTER
            .with_label_values(&[self.banner.id.as_str()])
            .inc();
        info!("Banner {} expired", self.banner.id);

        self.publish().await;
    }

    async fn publish(&self) {
        if let Err(e) = self.events.publish(&self.banner).await {
            warn!("Failed to publish change of banner {}: {}", self.banner.id, e);
        }
    }
}
