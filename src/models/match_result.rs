use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Side of the map a team or player belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Radiant,
    Dire,
}

/// A value held once per side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BySide<T> {
    pub radiant: T,
    pub dire: T,
}

impl<T> BySide<T> {
    pub fn new(radiant: T, dire: T) -> Self {
        Self { radiant, dire }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Radiant => &mut self.radiant,
            Side::Dire => &mut self.dire,
        }
    }
}

/// Whether a draft event picked or banned its hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftAction {
    Pick,
    Ban,
}

impl DraftAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftAction::Pick => "pick",
            DraftAction::Ban => "ban",
        }
    }
}

/// One numbered pick or ban of a side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub action: DraftAction,
    /// 1-based, counted per side and action
    pub index: u32,
    pub hero_id: u32,
}

impl DraftEntry {
    /// Key such as `pick_1` or `ban_3`
    pub fn key(&self) -> String {
        format!("{}_{}", self.action.as_str(), self.index)
    }
}

/// A player's upstream row together with their resolved display name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetail {
    /// `None` when the player is anonymous or no profile came back
    pub persona_name: Option<String>,

    /// Every field of the upstream player row, unchanged
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

/// Assembled match information; only requested groups are populated.
///
/// A requested group whose upstream value is missing or malformed stays
/// `None`: this applies to `radiant_win` and `start_time`. The other groups
/// always come back once requested, falling back to empty lists, zero
/// totals, `00m00s` or `tbd`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picks_bans: Option<BySide<Vec<DraftEntry>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kills: Option<BySide<u32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deaths: Option<BySide<u32>>,

    /// Seat (1-5) to player, per side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<BySide<BTreeMap<u8, PlayerDetail>>>,

    /// `MMmSSs`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub radiant_win: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<BySide<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Upstream error message this result was recorded with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_entry_key() {
        let entry = DraftEntry {
            action: DraftAction::Ban,
            index: 3,
            hero_id: 41,
        };
        assert_eq!(entry.key(), "ban_3");
    }

    #[test]
    fn test_unrequested_groups_are_not_serialized() {
        let result = MatchResult {
            duration: Some("41m07s".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "duration": "41m07s" }));
    }

    #[test]
    fn test_players_keep_seat_keys_through_json() {
        let mut players: BySide<BTreeMap<u8, PlayerDetail>> = BySide::default();
        players.dire.insert(
            4,
            PlayerDetail {
                persona_name: Some("Miracle-".to_string()),
                raw: serde_json::json!({
                    "account_id": 105248644,
                    "hero_id": 1,
                    "kills": 11,
                    "item_neutral": 300
                })
                .as_object()
                .cloned()
                .unwrap(),
            },
        );
        let result = MatchResult {
            players: Some(players),
            ..Default::default()
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["players"]["dire"]["4"]["persona_name"], "Miracle-");
        assert_eq!(value["players"]["dire"]["4"]["kills"], 11);
        assert_eq!(value["players"]["dire"]["4"]["item_neutral"], 300);
    }
}
