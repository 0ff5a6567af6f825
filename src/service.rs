use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::SteamWebClient;
use crate::config::Config;
use crate::db::ResultCache;
use crate::error::MatchInfoError;
use crate::models::{
    FieldGroup, FieldSelector, MatchDetailsEnvelope, MatchResult, PlayerSummariesEnvelope,
    RawMatch,
};
use crate::transform;

/// Fetches, assembles and caches match information
pub struct MatchInfoService {
    client: SteamWebClient,
    cache: ResultCache,
    api_key: Option<String>,
    match_details_url: String,
    player_summaries_url: String,
}

impl MatchInfoService {
    /// Create a new service from configuration and an opened cache
    pub fn new(config: &Config, cache: ResultCache) -> anyhow::Result<Self> {
        let client = SteamWebClient::new(Duration::from_secs(config.request_timeout_secs))?;

        Ok(Self {
            client,
            cache,
            api_key: config.steam_api_key.clone(),
            match_details_url: config.match_details_url.clone(),
            player_summaries_url: config.player_summaries_url.clone(),
        })
    }

    /// The cache this service reads and writes
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Get the requested field groups of a match, from cache when fresh.
    ///
    /// A fresh cache entry is returned as stored, whatever groups it holds.
    /// Only errored upstream outcomes are written to the cache; a successful
    /// fetch clears the entry for the match instead. Cache failures are
    /// logged and never change the outcome of the call.
    pub async fn get_match_info(
        &self,
        match_id: i64,
        fields: &FieldSelector,
    ) -> Result<MatchResult, MatchInfoError> {
        if match_id <= 0 {
            return Err(MatchInfoError::InvalidMatchId(match_id));
        }

        match self.cache.lookup(match_id).await {
            Ok(Some(cached)) if cached.fresh => {
                debug!("Cache hit for match {}", match_id);
                return Ok(cached.result);
            }
            Ok(Some(cached)) => {
                debug!(
                    "Cached result for match {} is stale (stored at {})",
                    match_id, cached.cached_at
                );
            }
            Ok(None) => debug!("Cache miss for match {}", match_id),
            Err(e) => warn!("Cache lookup for match {} failed: {:#}", match_id, e),
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MatchInfoError::MissingCredential)?;
        let api_key = urlencoding::encode(api_key);

        let json = self.fetch_match_details(&api_key, match_id).await?;

        if let Some(message) = MatchDetailsEnvelope::error_message(&json) {
            warn!("Steam Web API error for match {}: {}", match_id, message);

            let result = MatchResult {
                upstream_error: Some(message.clone()),
                ..Default::default()
            };
            if let Err(e) = self.cache.store(match_id, &result).await {
                warn!("Failed to cache error for match {}: {:#}", match_id, e);
            }

            return Err(MatchInfoError::UpstreamError(message));
        }

        let details: MatchDetailsEnvelope = serde_json::from_value(json).map_err(|e| {
            warn!("Unexpected match details payload: {}", e);
            MatchInfoError::NoUpstreamData
        })?;

        let result = self.assemble(&api_key, &details.result, fields).await;

        // Successful results are not cached; only the stale entry is dropped
        if let Err(e) = self.cache.invalidate(match_id).await {
            warn!("Failed to invalidate cache for match {}: {:#}", match_id, e);
        }

        info!("Assembled match {} ({} field groups)", match_id, fields.iter().count());
        Ok(result)
    }

    async fn fetch_match_details(
        &self,
        api_key: &str,
        match_id: i64,
    ) -> Result<Value, MatchInfoError> {
        let match_id = match_id.to_string();
        self.client
            .fetch_json(
                &self.match_details_url,
                &[("key", api_key), ("match_id", match_id.as_str())],
            )
            .await
            .map_err(|e| {
                warn!("Match details request failed: {}", e);
                MatchInfoError::NoUpstreamData
            })
    }

    /// Run the transformers for each requested group, in assembly order
    async fn assemble(
        &self,
        api_key: &str,
        details: &RawMatch,
        fields: &FieldSelector,
    ) -> MatchResult {
        let mut result = MatchResult::default();

        for group in fields.iter() {
            debug!("Assembling {}", group.as_str());

            match group {
                FieldGroup::PicksBans => {
                    result.picks_bans = Some(transform::picks_bans(details));
                }
                FieldGroup::KillsDeaths => {
                    let (kills, deaths) = transform::kills_deaths(details);
                    result.kills = Some(kills);
                    result.deaths = Some(deaths);
                }
                FieldGroup::Players => {
                    let names = self.fetch_persona_names(api_key, details).await;
                    result.players = Some(transform::players(details, &names));
                }
                FieldGroup::Duration => {
                    result.duration =
                        Some(transform::format_duration(details.duration.unwrap_or(0)));
                }
                FieldGroup::RadiantWin => {
                    result.radiant_win = details.radiant_win;
                }
                FieldGroup::Teams => {
                    result.teams = Some(transform::teams(details));
                }
                FieldGroup::StartTime => {
                    result.start_time = details.start_time.and_then(transform::format_start_time);
                }
            }
        }

        result
    }

    /// Resolve persona names for the match roster; failures leave names unresolved
    async fn fetch_persona_names(
        &self,
        api_key: &str,
        details: &RawMatch,
    ) -> HashMap<String, String> {
        let steam_ids = transform::lookup_steam_ids(details);
        if steam_ids.is_empty() {
            debug!("No public accounts in roster, skipping player summaries");
            return HashMap::new();
        }

        let steam_ids = steam_ids.join(",");
        let json = match self
            .client
            .fetch_json(
                &self.player_summaries_url,
                &[("key", api_key), ("steamids", steam_ids.as_str())],
            )
            .await
        {
            Ok(json) => json,
            Err(e) => {
                warn!("Player summaries request failed: {}", e);
                return HashMap::new();
            }
        };

        match serde_json::from_value::<PlayerSummariesEnvelope>(json) {
            Ok(summaries) => transform::persona_names(&summaries),
            Err(e) => {
                warn!("Unexpected player summaries payload: {}", e);
                HashMap::new()
            }
        }
    }
}
