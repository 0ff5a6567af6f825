use serde::Deserialize;

use super::lenient;

/// GetPlayerSummaries response wrapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerSummariesEnvelope {
    #[serde(default)]
    pub response: PlayerSummariesResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerSummariesResponse {
    /// Profiles that fail to parse are skipped
    #[serde(default, deserialize_with = "lenient::list")]
    pub players: Vec<PlayerSummary>,
}

/// Public profile of a single Steam account
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSummary {
    /// 64-bit Steam id, as a decimal string
    pub steamid: String,
    pub personaname: String,
}
