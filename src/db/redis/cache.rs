use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// TMDB popular movies, by page
    TmdbPopular(u32),
    /// TMDB movie bundle (details + credits + keywords), by TMDB id
    TmdbMovie(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::TmdbPopular(page) => write!(f, "tmdb:popular:{}", page),
            CacheKey::TmdbMovie(id) => write!(f, "tmdb:movie:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// A pending cache write
struct PendingWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache backed by Redis
///
/// Reads hit Redis directly; writes are handed to a background task over a
/// channel so that callers never wait on Redis when storing a value.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Handle for flushing and stopping the cache write task
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates the cache and spawns its background write task
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_client = redis_client.clone();
        tokio::spawn(async move {
            Self::run_writer(writer_client, write_rx, shutdown_rx).await;
        });

        (
            Self {
                redis_client,
                write_tx,
            },
            CacheWriterHandle { shutdown_tx },
        )
    }

    /// Background loop draining the write channel into Redis
    ///
    /// On shutdown, remaining queued writes are flushed before the task exits.
    async fn run_writer(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::debug!("Cache writer task started");

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = Self::store(&client, write).await {
                        tracing::error!(error = %e, "Cache write failed");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0;
                    while let Some(write) = write_rx.recv().await {
                        if let Err(e) = Self::store(&client, write).await {
                            tracing::error!(error = %e, "Cache flush write failed");
                        } else {
                            flushed += 1;
                        }
                    }
                    tracing::info!(flushed, "Cache writer stopped");
                    break;
                }
            }
        }
    }

    async fn store(client: &Client, write: PendingWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.value, write.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serializes a value and queues it for a background write
    ///
    /// Returns immediately; a failed write is logged, never surfaced to the
    /// caller.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::error!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}
