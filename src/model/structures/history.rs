use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::database::db_structs::PlayedMap;

/// Every leaderboard the requesting player has a score on, across the whole
/// score history (not only the pool).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerHistory {
    played: HashMap<String, Option<DateTime<Utc>>>
}

impl PlayerHistory {
    pub fn new(played: &[PlayedMap]) -> PlayerHistory {
        let mut map: HashMap<String, Option<DateTime<Utc>>> = HashMap::with_capacity(played.len());

        for p in played {
            // Most recent play time wins, None orders below any timestamp
            let entry = map.entry(p.leaderboard_id.clone()).or_insert(None);
            *entry = (*entry).max(p.timeset);
        }

        PlayerHistory { played: map }
    }

    pub fn has_played(&self, leaderboard_id: &str) -> bool {
        self.played.contains_key(leaderboard_id)
    }

    pub fn len(&self) -> usize {
        self.played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.played.is_empty()
    }

    pub fn played_ids(&self) -> impl Iterator<Item = &str> {
        self.played.keys().map(String::as_str)
    }

    /// Leaderboards played within `days` of `now`. Plays without a timestamp never qualify.
    pub fn played_within(&self, days: i64, now: DateTime<Utc>) -> impl Iterator<Item = &str> {
        let cutoff = now - Duration::days(days);

        self.played
            .iter()
            .filter(move |(_, timeset)| timeset.is_some_and(|t| t >= cutoff))
            .map(|(id, _)| id.as_str())
    }
}
