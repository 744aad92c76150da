use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: Option<String>,
    /// Global rank
    pub rank: i32,
    pub pp: f32
}

/// One of a player's best scores, as read from the score history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopScore {
    pub player_id: String,
    pub leaderboard_id: String,
    pub pp: f32
}

/// Map metadata from the leaderboard catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub id: String,
    pub hash: String,
    pub name: String,
    pub mapper: String,
    pub difficulty_name: String,
    pub mode_name: String,
    pub stars: f32,
    pub acc_rating: f32,
    pub tech_rating: f32,
    pub pass_rating: f32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayedMap {
    pub leaderboard_id: String,
    pub timeset: Option<DateTime<Utc>>
}
