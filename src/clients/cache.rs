//! Cache client for generated-data pools and response caching.
//!
//! Backed by Redis. A failed cache is never fatal: connection problems
//! downgrade the client to a disabled state and every operation becomes a
//! cheap no-op, so generation keeps working without it.

use redis::aio::ConnectionManager;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::Settings;

/// Async cache client with list-backed data pools.
pub struct CacheClient {
    url: String,
    default_ttl: u64,
    manager: RwLock<Option<ConnectionManager>>,
}

impl CacheClient {
    /// Build an unconnected client from settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            url: settings.redis_url.clone(),
            default_ttl: settings.cache_ttl_seconds,
            manager: RwLock::new(None),
        }
    }

    /// Connect to the cache server.
    ///
    /// Failure leaves the client disabled rather than propagating; the
    /// service runs without a cache.
    pub async fn connect(&self) {
        let connect = async {
            let client = redis::Client::open(self.url.as_str())?;
            client.get_connection_manager().await
        };

        match connect.await {
            Ok(manager) => {
                *self.manager.write().await = Some(manager);
                tracing::info!(url = %self.url, "cache_connected");
            }
            Err(e) => {
                *self.manager.write().await = None;
                tracing::error!(error = %e, "cache_connection_failed");
            }
        }
    }

    /// Drop the connection.
    pub async fn disconnect(&self) {
        *self.manager.write().await = None;
        tracing::info!("cache_disconnected");
    }

    /// Whether the cache is currently usable.
    pub async fn is_enabled(&self) -> bool {
        self.manager.read().await.is_some()
    }

    async fn connection(&self) -> Option<ConnectionManager> {
        self.manager.read().await.clone()
    }

    /// Get a cached value, or `None` on miss or disabled cache.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut con = self.connection().await?;
        match redis::cmd("GET").arg(key).query_async(&mut con).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "cache_get_failed");
                None
            }
        }
    }

    /// Set a value with a TTL (`None` uses the configured default).
    pub async fn set(&self, key: &str, value: &str, ttl: Option<u64>) {
        let Some(mut con) = self.connection().await else {
            return;
        };
        let ttl = ttl.unwrap_or(self.default_ttl);
        let result: redis::RedisResult<()> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl)
            .query_async(&mut con)
            .await;
        if let Err(e) = result {
            tracing::error!(key, error = %e, "cache_set_failed");
        }
    }

    /// Delete a key.
    pub async fn delete(&self, key: &str) {
        let Some(mut con) = self.connection().await else {
            return;
        };
        let result: redis::RedisResult<()> =
            redis::cmd("DEL").arg(key).query_async(&mut con).await;
        if let Err(e) = result {
            tracing::error!(key, error = %e, "cache_delete_failed");
        }
    }

    /// Take up to `count` items from a data pool.
    ///
    /// Retrieved items are removed from the pool. Returns fewer than
    /// requested when the pool runs short.
    pub async fn get_from_pool(&self, pool_name: &str, count: usize) -> Vec<Value> {
        let Some(mut con) = self.connection().await else {
            return Vec::new();
        };
        let pool_key = format!("pool:{pool_name}");

        let items: Vec<String> = match redis::cmd("LRANGE")
            .arg(&pool_key)
            .arg(0)
            .arg(count as i64 - 1)
            .query_async(&mut con)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(pool = pool_name, error = %e, "pool_get_failed");
                return Vec::new();
            }
        };

        if !items.is_empty() {
            let result: redis::RedisResult<()> = redis::cmd("LTRIM")
                .arg(&pool_key)
                .arg(items.len() as i64)
                .arg(-1)
                .query_async(&mut con)
                .await;
            if let Err(e) = result {
                tracing::error!(pool = pool_name, error = %e, "pool_trim_failed");
            }
        }

        items
            .iter()
            .filter_map(|item| serde_json::from_str(item).ok())
            .collect()
    }

    /// Append items to a data pool, setting the default TTL if none is set.
    pub async fn add_to_pool(&self, pool_name: &str, data: &[Value]) {
        let Some(mut con) = self.connection().await else {
            return;
        };
        if data.is_empty() {
            return;
        }
        let pool_key = format!("pool:{pool_name}");

        let mut push = redis::cmd("RPUSH");
        push.arg(&pool_key);
        for item in data {
            push.arg(item.to_string());
        }
        let result: redis::RedisResult<()> = push.query_async(&mut con).await;
        if let Err(e) = result {
            tracing::error!(pool = pool_name, error = %e, "pool_add_failed");
            return;
        }

        let ttl: i64 = redis::cmd("TTL")
            .arg(&pool_key)
            .query_async(&mut con)
            .await
            .unwrap_or(-1);
        if ttl == -1 {
            let result: redis::RedisResult<()> = redis::cmd("EXPIRE")
                .arg(&pool_key)
                .arg(self.default_ttl)
                .query_async(&mut con)
                .await;
            if let Err(e) = result {
                tracing::error!(pool = pool_name, error = %e, "pool_expire_failed");
            }
        }
    }

    /// Current number of items in a pool.
    pub async fn get_pool_size(&self, pool_name: &str) -> u64 {
        let Some(mut con) = self.connection().await else {
            return 0;
        };
        redis::cmd("LLEN")
            .arg(format!("pool:{pool_name}"))
            .query_async(&mut con)
            .await
            .unwrap_or(0)
    }

    /// Build a cache key from request parameters, sorted for stability.
    pub fn build_cache_key(domain: &str, entity: &str, extra: &[(&str, &str)]) -> String {
        let mut parts = vec![domain.to_string(), entity.to_string()];
        let mut sorted: Vec<_> = extra.to_vec();
        sorted.sort_by_key(|(k, _)| *k);
        for (key, value) in sorted {
            parts.push(format!("{key}:{value}"));
        }
        parts.join(":")
    }
}
