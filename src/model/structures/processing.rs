use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Pipeline stages of a ranked suggestion run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    OriginSelection,
    LinkGeneration,
    Aggregation,
    FilterRanking,
    Fusion,
    Filtering
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OriginSource {
    /// Picked from the requesting player's own pool scores
    Played,
    /// Player had no usable history; global filler maps were used
    Filler
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginSelection {
    pub leaderboard_ids: Vec<String>,
    pub source: OriginSource
}

/// The two independent orderings over target endpoints, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOrderings {
    pub style: Vec<String>,
    pub overweight: Vec<String>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedScore {
    pub leaderboard_id: String,
    pub style_fraction: f64,
    pub overweight_fraction: f64,
    /// Product of both remapped fractions. Lower is better.
    pub score: f64
}

/// Everything a ranked run produced, so the final ordering can be explained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSuggestion {
    pub player_id: String,
    pub origins: OriginSelection,
    pub link_count: usize,
    pub linked_players: usize,
    pub orderings: FilterOrderings,
    /// Fused ordering before any map was removed
    pub fused: Vec<FusedScore>,
    /// Final ordered leaderboard ids
    pub suggestions: Vec<String>
}

impl RankedSuggestion {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}
