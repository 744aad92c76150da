use std::collections::BTreeMap;

use serde::Serialize;

/// A single score kept in the comparison pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolScore {
    pub leaderboard_id: String,
    pub pp: f32,
    /// 1-indexed position within the owning player's kept list
    pub rank: u32,
    /// Index of the owning player in [`ScorePool::players`]
    #[serde(skip)]
    pub owner: usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolPlayer {
    pub id: String,
    pub name: Option<String>,
    /// Global rank of the player
    pub rank: i32,
    /// Ordered by points, best first
    pub scores: Vec<PoolScore>
}

impl PoolPlayer {
    /// The player's kept rank on a leaderboard, if they have a score on it
    pub fn rank_on(&self, leaderboard_id: &str) -> Option<u32> {
        self.scores
            .iter()
            .find(|s| s.leaderboard_id == leaderboard_id)
            .map(|s| s.rank)
    }
}

/// Aggregate values for one leaderboard over the pool snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMeta {
    pub leaderboard_id: String,
    pub count: u32,
    pub total_rank: f64,
    pub max_pp: f64,
    pub min_pp: f64,
    pub total_pp: f64,
    pub average_pp: f64
}

impl MapMeta {
    pub fn new(leaderboard_id: &str) -> MapMeta {
        MapMeta {
            leaderboard_id: leaderboard_id.to_owned(),
            count: 0,
            total_rank: 0.0,
            max_pp: 0.0,
            min_pp: f64::MAX,
            total_pp: 0.0,
            average_pp: 0.0
        }
    }

    pub fn record(&mut self, score: &PoolScore) {
        let pp = score.pp as f64;

        self.count += 1;
        self.total_rank += score.rank as f64;
        self.max_pp = self.max_pp.max(pp);
        self.min_pp = self.min_pp.min(pp);
        self.total_pp += pp;
    }

    pub fn average_rank(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        self.total_rank / self.count as f64
    }
}

/// The capped, fairness-sampled comparison universe.
///
/// Built once per snapshot and treated as read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScorePool {
    pub players: Vec<PoolPlayer>,
    pub meta: BTreeMap<String, MapMeta>
}

impl ScorePool {
    pub fn player(&self, player_id: &str) -> Option<&PoolPlayer> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn meta(&self, leaderboard_id: &str) -> Option<&MapMeta> {
        self.meta.get(leaderboard_id)
    }

    /// Highest global rank among pool players, 0 when the pool is empty
    pub fn max_rank(&self) -> i32 {
        self.players.iter().map(|p| p.rank).max().unwrap_or(0)
    }

    pub fn score_count(&self) -> usize {
        self.players.iter().map(|p| p.scores.len()).sum()
    }
}
