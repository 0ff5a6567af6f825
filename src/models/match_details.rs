use serde::Deserialize;
use serde_json::{Map, Value};

use super::lenient;

/// GetMatchDetails response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDetailsEnvelope {
    pub result: RawMatch,
}

impl MatchDetailsEnvelope {
    /// Upstream error marker of a raw details response, if any.
    ///
    /// Read straight from the JSON so a malformed data field never hides it.
    pub fn error_message(json: &Value) -> Option<String> {
        match json.get("result")?.get("error")? {
            Value::Null => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Match details as returned by the Steam Web API.
///
/// Every field is optional upstream; values of an unexpected shape read as
/// missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatch {
    #[serde(default, deserialize_with = "lenient::list")]
    pub players: Vec<RawPlayer>,

    /// Draft in upstream order; empty for matches without a draft phase
    #[serde(default, deserialize_with = "lenient::list")]
    pub picks_bans: Vec<RawPickBan>,

    /// Match length in seconds
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration: Option<u64>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub radiant_win: Option<bool>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub radiant_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub dire_name: Option<String>,

    /// Unix timestamp of the match start
    #[serde(default, deserialize_with = "lenient::optional")]
    pub start_time: Option<i64>,
}

/// One draft event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPickBan {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub is_pick: Option<bool>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub hero_id: Option<u32>,

    /// 0 = radiant, anything else = dire
    #[serde(default, deserialize_with = "lenient::optional")]
    pub team: Option<u8>,
}

/// One player row of the match details, kept exactly as upstream sent it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawPlayer {
    pub raw: Map<String, Value>,
}

impl RawPlayer {
    /// 32-bit account id; `ANONYMOUS_ACCOUNT_ID` for private profiles, `None` for bots
    pub fn account_id(&self) -> Option<u32> {
        self.number("account_id")
    }

    /// Bit 7 is the side, low bits the position within the side; missing reads as 0
    pub fn player_slot(&self) -> u8 {
        self.number("player_slot").unwrap_or(0)
    }

    pub fn kills(&self) -> u32 {
        self.number("kills").unwrap_or(0)
    }

    pub fn deaths(&self) -> u32 {
        self.number("deaths").unwrap_or(0)
    }

    fn number<T: TryFrom<u64>>(&self, key: &str) -> Option<T> {
        self.raw
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| T::try_from(n).ok())
    }
}
