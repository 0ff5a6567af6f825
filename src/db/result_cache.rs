use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::{info, warn};

use crate::models::MatchResult;

/// Version tag written into every cached blob
const CACHE_FORMAT_VERSION: u32 = 1;

/// A cached match result and whether it is still within the TTL
#[derive(Debug, Clone)]
pub struct CachedResult {
    pub result: MatchResult,
    pub fresh: bool,
    /// Unix seconds the entry was written at
    pub cached_at: i64,
}

/// On-disk encoding of a cached result
#[derive(Serialize, Deserialize)]
struct CacheBlob {
    version: u32,
    result: MatchResult,
}

/// SQLite store mapping match id -> assembled result
pub struct ResultCache {
    pool: Pool<Sqlite>,
    ttl_secs: i64,
}

impl ResultCache {
    /// Create a new result cache and initialize the database
    pub async fn new(database_url: &str, ttl_secs: u64) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        // An in-memory database lives and dies with its single connection
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let cache = Self {
            pool,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        };
        cache.init_schema().await?;

        info!("Result cache initialized (ttl: {}s)", cache.ttl_secs);
        Ok(cache)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS match_info_cache (
                match_id INTEGER PRIMARY KEY,
                api_result TEXT NOT NULL,
                cached_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create match_info_cache table")?;

        Ok(())
    }

    /// Look up the entry for a match, flagging whether it is still fresh
    pub async fn lookup(&self, match_id: i64) -> Result<Option<CachedResult>> {
        self.lookup_at(match_id, Utc::now().timestamp()).await
    }

    /// `lookup` with an explicit current time in Unix seconds
    pub async fn lookup_at(&self, match_id: i64, now: i64) -> Result<Option<CachedResult>> {
        let row: Option<(String, i64)> = sqlx::query_as(
            "SELECT api_result, cached_at FROM match_info_cache WHERE match_id = ?",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read cached match result")?;

        let Some((blob, cached_at)) = row else {
            return Ok(None);
        };

        let result = match decode_blob(&blob) {
            Some(result) => result,
            None => {
                warn!("Ignoring unreadable cache entry for match {}", match_id);
                return Ok(None);
            }
        };

        Ok(Some(CachedResult {
            result,
            fresh: now.saturating_sub(cached_at) < self.ttl_secs,
            cached_at,
        }))
    }

    /// Replace the entry for a match, stamped with the current time
    pub async fn store(&self, match_id: i64, result: &MatchResult) -> Result<()> {
        self.store_at(match_id, result, Utc::now().timestamp()).await
    }

    /// `store` with an explicit timestamp in Unix seconds
    pub async fn store_at(&self, match_id: i64, result: &MatchResult, cached_at: i64) -> Result<()> {
        let blob = serde_json::to_string(&CacheBlob {
            version: CACHE_FORMAT_VERSION,
            result: result.clone(),
        })
        .context("Failed to serialize match result")?;

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM match_info_cache WHERE match_id = ?")
            .bind(match_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete cached match result")?;

        sqlx::query(
            "INSERT INTO match_info_cache (match_id, api_result, cached_at) VALUES (?, ?, ?)",
        )
        .bind(match_id)
        .bind(&blob)
        .bind(cached_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert cached match result")?;

        tx.commit().await.context("Failed to commit cache write")?;

        Ok(())
    }

    /// Drop the entry for a match; returns whether one existed
    pub async fn invalidate(&self, match_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM match_info_cache WHERE match_id = ?")
            .bind(match_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete cached match result")?;

        Ok(result.rows_affected() > 0)
    }

    /// Close every pooled connection; later cache calls fail
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn decode_blob(blob: &str) -> Option<MatchResult> {
    let decoded: CacheBlob = serde_json::from_str(blob).ok()?;
    (decoded.version == CACHE_FORMAT_VERSION).then_some(decoded.result)
}
