use serde::{Deserialize, Serialize};

use crate::model::constants;

/// Which already-played maps are dropped from the fused ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayedFilter {
    /// Every map the player has a score on
    AllTime,
    /// Only maps played within the given number of days
    WithinDays(i64),
    Off
}

/// Tunables for one ranked (link graph) suggestion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Best scores considered per player when selecting pool candidates
    pub candidate_window: usize,
    /// Minimum weakest/best points ratio for a player to enter the pool
    pub consistency_ratio: f32,
    /// Maximum scores a single player contributes to the pool
    pub pool_player_cap: usize,
    pub origin_count: usize,
    pub extra_count: usize,
    /// Most origin leaderboards a run may use
    pub origin_cap: usize,
    /// Fraction of a player's scores kept before relative filtering
    pub origin_retention: f64,
    pub recency_decay: f64,
    pub filler_min_links: u32,
    pub filler_easiest_fraction: f64,
    /// Fraction of candidate links (best distance first) that survive
    pub link_survival: f64,
    pub relevance_min_links: usize,
    pub neutral_rank: f64,
    pub style_weight: f64,
    pub overweight_weight: f64,
    pub ignore_non_improvable: bool,
    pub improvement_margin: usize,
    pub played_filter: PlayedFilter,
    /// Drop every played map from the final list regardless of `played_filter`
    pub unplayed_only: bool,
    pub suggestion_count: usize,
    pub playlist_author: String
}

impl SuggestConfig {
    /// Filter weights as applied during fusion. Both weights at zero means full weight for both.
    pub fn effective_weights(&self) -> (f64, f64) {
        if self.style_weight == 0.0 && self.overweight_weight == 0.0 {
            return (1.0, 1.0);
        }

        (self.style_weight, self.overweight_weight)
    }

    pub fn origin_window(&self) -> usize {
        self.origin_count + self.extra_count
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            candidate_window: constants::CANDIDATE_WINDOW,
            consistency_ratio: constants::CONSISTENCY_RATIO,
            pool_player_cap: constants::POOL_PLAYER_CAP,
            origin_count: constants::ORIGIN_COUNT,
            extra_count: constants::EXTRA_COUNT,
            origin_cap: constants::ORIGIN_CAP,
            origin_retention: constants::ORIGIN_RETENTION,
            recency_decay: constants::RECENCY_DECAY,
            filler_min_links: constants::FILLER_MIN_LINKS,
            filler_easiest_fraction: constants::FILLER_EASIEST_FRACTION,
            link_survival: constants::LINK_SURVIVAL,
            relevance_min_links: constants::RELEVANCE_MIN_LINKS,
            neutral_rank: constants::NEUTRAL_RANK,
            style_weight: constants::STYLE_WEIGHT,
            overweight_weight: constants::OVERWEIGHT_WEIGHT,
            ignore_non_improvable: true,
            improvement_margin: constants::IMPROVEMENT_MARGIN,
            played_filter: PlayedFilter::AllTime,
            unplayed_only: true,
            suggestion_count: constants::SUGGESTION_COUNT,
            playlist_author: constants::PLAYLIST_AUTHOR.to_string()
        }
    }
}

/// Tunables for the rating similarity recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub rating_ceiling: f64,
    pub tolerance_start: f64,
    pub tolerance_step: f64,
    pub tolerance_ceiling: f64,
    pub min_dimensions: usize,
    pub match_target: usize,
    pub unplayed_only: bool,
    pub playlist_author: String
}

impl SimilarityConfig {
    /// Number of tolerance levels the convergence loop may examine
    pub fn max_iterations(&self) -> usize {
        if self.tolerance_step <= 0.0 || self.tolerance_ceiling < self.tolerance_start {
            return 1;
        }

        // Rounded so that float noise in the range does not drop the last level
        let steps = ((self.tolerance_ceiling - self.tolerance_start) / self.tolerance_step + 1e-9).floor();
        steps as usize + 1
    }

    pub fn tolerance_at(&self, iteration: usize) -> f64 {
        self.tolerance_start + self.tolerance_step * iteration as f64
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            rating_ceiling: constants::RATING_CEILING,
            tolerance_start: constants::TOLERANCE_START,
            tolerance_step: constants::TOLERANCE_STEP,
            tolerance_ceiling: constants::TOLERANCE_CEILING,
            min_dimensions: constants::SIMILARITY_MIN_DIMENSIONS,
            match_target: constants::SIMILARITY_MATCH_TARGET,
            unplayed_only: true,
            playlist_author: constants::PLAYLIST_AUTHOR.to_string()
        }
    }
}
