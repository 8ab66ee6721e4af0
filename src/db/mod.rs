use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::models::banner::Banner;

/// Opens the Redis client and a shared multiplexed connection.
pub async fn connect_redis(url: &str) -> anyhow::Result<(redis::Client, MultiplexedConnection)> {
    let client = redis::Client::open(url)?;
    let conn = client.get_multiplexed_async_connection().await?;
    Ok((client, conn))
}

fn banner_key(id: &str) -> String {
    format!("banner:{}", id)
}

/// Where banner state lives between activations.
#[derive(Clone)]
pub enum StateStore {
    Memory(Arc<Mutex<HashMap<String, Banner>>>),
    Redis(MultiplexedConnection),
    /// Reads from the map, refuses every write.
    #[cfg(test)]
    ReadOnly(Arc<Mutex<HashMap<String, Banner>>>),
}

impl StateStore {
    pub fn memory() -> Self {
        StateStore::Memory(Arc::new(Mutex::new(HashMap::new())))
    }

    pub async fn load(&self, id: &str) -> anyhow::Result<Option<Banner>> {
        match self {
            StateStore::Memory(map) => {
                let map = map.lock().unwrap_or_else(|e| e.into_inner());
                Ok(map.get(id).cloned())
            }
            StateStore::Redis(conn) => {
                let mut conn = conn.clone();
                let raw: Option<String> = conn.get(banner_key(id)).await?;
                match raw {
                    Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                    None => Ok(None),
                }
            }
            #[cfg(test)]
            StateStore::ReadOnly(map) => {
                let map = map.lock().unwrap_or_else(|e| e.into_inner());
                Ok(map.get(id).cloned())
            }
        }
    }

    pub async fn save(&self, banner: &Banner) -> anyhow::Result<()> {
        match self {
            StateStore::Memory(map) => {
                let mut map = map.lock().unwrap_or_else(|e| e.into_inner());
                map.insert(banner.id.clone(), banner.clone());
                Ok(())
            }
            StateStore::Redis(conn) => {
                let mut conn = conn.clone();
                let json = serde_json::to_string(banner)?;
                conn.set::<_, _, ()>(banner_key(&banner.id), json).await?;
                Ok(())
            }
            #[cfg(test)]
            StateStore::ReadOnly(_) => {
                anyhow::bail!("store is read-only, cannot save banner {}", banner.id)
            }
        }
    }
}

#[cfg(test)]
impl StateStore {
    /// A store holding `banners` that rejects writes.
    pub fn read_only(banners: Vec<Banner>) -> Self {
        let map = banners.into_iter().map(|b| (b.id.clone(), b)).collect();
        StateStore::ReadOnly(Arc::new(Mutex::new(map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_key() {
        assert_eq!(banner_key("sparky"), "banner:sparky");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = StateStore::memory();
        assert!(store.load("sparky").await.unwrap().is_none());

        let mut banner = Banner::empty("sparky");
        banner.message = "hello".into();
        store.save(&banner).await.unwrap();

        assert_eq!(store.load("sparky").await.unwrap(), Some(banner));
        assert!(store.load("lightning").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_only_store_rejects_writes() {
        let store = StateStore::read_only(vec![Banner::empty("sparky")]);
        assert_eq!(store.load("sparky").await.unwrap(), Some(Banner::empty("sparky")));
        assert!(store.save(&Banner::empty("sparky")).await.is_err());
    }
}
