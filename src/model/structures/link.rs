use serde::Serialize;

use super::pool::PoolScore;

/// The parts of a pool score a link needs to keep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedScore {
    pub leaderboard_id: String,
    pub pp: f32,
    pub rank: u32
}

impl From<&PoolScore> for LinkedScore {
    fn from(score: &PoolScore) -> Self {
        LinkedScore {
            leaderboard_id: score.leaderboard_id.clone(),
            pp: score.pp,
            rank: score.rank
        }
    }
}

/// A connection between an origin score and a target score of the same player.
///
/// Endpoint fields are indices into the origin and target
/// [`EndpointCollection`](super::endpoint::EndpointCollection)s and are only
/// meaningful once the graph has been assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub player_id: String,
    pub origin: LinkedScore,
    pub target: LinkedScore,
    pub distance: f64,
    pub origin_endpoint: usize,
    pub target_endpoint: usize
}
