//! Normalization of raw Steam Web API match data into `MatchResult` groups.
//!
//! Everything here is pure; the player-name lookup that `players` depends on
//! is performed by the caller and handed in as a steam id -> name map.

use std::collections::{BTreeMap, HashMap};

use chrono::{TimeZone, Utc};
use tracing::warn;

use crate::models::{
    BySide, DraftAction, DraftEntry, PlayerDetail, PlayerSummariesEnvelope, RawMatch, RawPlayer,
    Side,
};

/// Account id reported for players hiding their profile
pub const ANONYMOUS_ACCOUNT_ID: u32 = u32::MAX;

/// Offset between 32-bit account ids and 64-bit individual Steam ids
pub const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

/// Slots at or above this value belong to dire
const DIRE_SLOT_BASE: u8 = 128;

const SEATS_PER_SIDE: u8 = 5;

/// Placeholder team name when upstream has none
pub const UNKNOWN_TEAM: &str = "tbd";

/// Appended verbatim to formatted start times
const START_TIME_SUFFIX: &str = "{{Abbr/UTC}}";

/// Map a 32-bit account id (0..=u32::MAX) to its 64-bit Steam id
pub fn steam_id_from_account_id(account_id: u32) -> u64 {
    STEAM_ID64_BASE + u64::from(account_id)
}

/// Side a raw slot belongs to
pub fn side_for_slot(slot: u8) -> Side {
    if slot < DIRE_SLOT_BASE {
        Side::Radiant
    } else {
        Side::Dire
    }
}

/// Side and 1-based seat of a raw slot.
///
/// Radiant slots start at 0, dire slots at 128. Seats outside 1..=5 are
/// clamped to the nearest edge.
pub fn seat_for_slot(slot: u8) -> (Side, u8) {
    match side_for_slot(slot) {
        Side::Radiant => (Side::Radiant, slot.saturating_add(1).min(SEATS_PER_SIDE)),
        Side::Dire => (
            Side::Dire,
            (slot - (DIRE_SLOT_BASE - 1)).clamp(1, SEATS_PER_SIDE),
        ),
    }
}

/// Number each pick and ban per side in upstream order
pub fn picks_bans(details: &RawMatch) -> BySide<Vec<DraftEntry>> {
    let mut draft: BySide<Vec<DraftEntry>> = BySide::default();
    let mut picks = BySide::new(0u32, 0u32);
    let mut bans = BySide::new(0u32, 0u32);

    for event in &details.picks_bans {
        let side = if event.team.unwrap_or(0) == 0 {
            Side::Radiant
        } else {
            Side::Dire
        };

        let (action, counter) = if event.is_pick.unwrap_or(false) {
            (DraftAction::Pick, picks.get_mut(side))
        } else {
            (DraftAction::Ban, bans.get_mut(side))
        };
        *counter += 1;

        draft.get_mut(side).push(DraftEntry {
            action,
            index: *counter,
            hero_id: event.hero_id.unwrap_or(0),
        });
    }

    draft
}

/// Total kills and deaths per side
pub fn kills_deaths(details: &RawMatch) -> (BySide<u32>, BySide<u32>) {
    let mut kills = BySide::new(0u32, 0u32);
    let mut deaths = BySide::new(0u32, 0u32);

    for player in &details.players {
        let side = side_for_slot(player.player_slot());
        *kills.get_mut(side) += player.kills();
        *deaths.get_mut(side) += player.deaths();
    }

    (kills, deaths)
}

/// Steam ids worth looking up, in roster order; anonymous players and bots are skipped
pub fn lookup_steam_ids(details: &RawMatch) -> Vec<String> {
    details
        .players
        .iter()
        .filter_map(RawPlayer::account_id)
        .filter(|&account_id| account_id != ANONYMOUS_ACCOUNT_ID)
        .map(|account_id| steam_id_from_account_id(account_id).to_string())
        .collect()
}

/// Steam id -> persona name
pub fn persona_names(summaries: &PlayerSummariesEnvelope) -> HashMap<String, String> {
    summaries
        .response
        .players
        .iter()
        .map(|summary| (summary.steamid.clone(), summary.personaname.clone()))
        .collect()
}

/// Seat each player and attach their resolved name.
///
/// Two players landing on the same seat keep the later one.
pub fn players(
    details: &RawMatch,
    names: &HashMap<String, String>,
) -> BySide<BTreeMap<u8, PlayerDetail>> {
    let mut roster: BySide<BTreeMap<u8, PlayerDetail>> = BySide::default();

    for player in &details.players {
        let (side, seat) = seat_for_slot(player.player_slot());

        let persona_name = player
            .account_id()
            .filter(|&account_id| account_id != ANONYMOUS_ACCOUNT_ID)
            .and_then(|account_id| names.get(&steam_id_from_account_id(account_id).to_string()))
            .cloned();

        let detail = PlayerDetail {
            persona_name,
            raw: player.raw.clone(),
        };

        if roster.get_mut(side).insert(seat, detail).is_some() {
            warn!(
                "Player slot {} replaced an earlier player in {:?} seat {}",
                player.player_slot(),
                side,
                seat
            );
        }
    }

    roster
}

/// `MMmSSs`; minutes keep growing past 59
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}m{:02}s", seconds / 60, seconds % 60)
}

/// Radiant and dire team names, `tbd` when absent
pub fn teams(details: &RawMatch) -> BySide<String> {
    BySide::new(
        details
            .radiant_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
        details
            .dire_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
    )
}

/// e.g. `June 4, 2016 - 13:05 {{Abbr/UTC}}`
pub fn format_start_time(epoch_seconds: i64) -> Option<String> {
    Utc.timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|dt| format!("{} {}", dt.format("%B %-d, %Y - %H:%M"), START_TIME_SUFFIX))
}
