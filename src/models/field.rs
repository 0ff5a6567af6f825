use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A group of result fields that can be requested.
///
/// Declaration order is the order the groups are assembled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    PicksBans,
    KillsDeaths,
    Players,
    Duration,
    RadiantWin,
    Teams,
    StartTime,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 7] = [
        FieldGroup::PicksBans,
        FieldGroup::KillsDeaths,
        FieldGroup::Players,
        FieldGroup::Duration,
        FieldGroup::RadiantWin,
        FieldGroup::Teams,
        FieldGroup::StartTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::PicksBans => "picks_bans",
            FieldGroup::KillsDeaths => "kills_deaths",
            FieldGroup::Players => "players",
            FieldGroup::Duration => "duration",
            FieldGroup::RadiantWin => "radiant_win",
            FieldGroup::Teams => "teams",
            FieldGroup::StartTime => "start_time",
        }
    }
}

impl FromStr for FieldGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| format!("unknown field group '{}'", s))
    }
}

/// Set of requested field groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    groups: BTreeSet<FieldGroup>,
}

impl FieldSelector {
    /// Every field group
    pub fn all() -> Self {
        FieldGroup::ALL.into_iter().collect()
    }

    /// Build a selector from group names, silently dropping unknown names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| match name.as_ref().trim().parse::<FieldGroup>() {
                Ok(group) => Some(group),
                Err(e) => {
                    debug!("Ignoring {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn contains(&self, group: FieldGroup) -> bool {
        self.groups.contains(&group)
    }

    /// Requested groups in assembly order
    pub fn iter(&self) -> impl Iterator<Item = FieldGroup> + '_ {
        self.groups.iter().copied()
    }
}

impl FromIterator<FieldGroup> for FieldSelector {
    fn from_iter<T: IntoIterator<Item = FieldGroup>>(iter: T) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_names_are_ignored() {
        let selector = FieldSelector::from_names(["teams", "deaths", "bogus", "duration"]);

        assert!(selector.contains(FieldGroup::Teams));
        assert!(selector.contains(FieldGroup::Duration));
        assert!(!selector.contains(FieldGroup::KillsDeaths));
        assert_eq!(selector.iter().count(), 2);
    }

    #[test]
    fn test_iteration_follows_assembly_order() {
        let selector = FieldSelector::from_names(["start_time", "players", "picks_bans"]);
        let order: Vec<FieldGroup> = selector.iter().collect();

        assert_eq!(
            order,
            vec![FieldGroup::PicksBans, FieldGroup::Players, FieldGroup::StartTime]
        );
    }

    #[test]
    fn test_all_round_trips_names() {
        for group in FieldGroup::ALL {
            assert_eq!(group.as_str().parse::<FieldGroup>(), Ok(group));
        }
        assert_eq!(FieldSelector::all().iter().count(), 7);
        assert_eq!(FieldSelector::from_names(Vec::<String>::new()).iter().count(), 0);
    }
}
