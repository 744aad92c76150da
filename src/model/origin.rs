use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::model::structures::{
    pool::{PoolPlayer, PoolScore, ScorePool},
    processing::{OriginSelection, OriginSource},
    suggest_config::SuggestConfig
};

/// Points discounted by how far down the player's list the score sits
pub fn weighted_score_value(pp: f32, rank: u32, decay: f64) -> f64 {
    pp as f64 * decay.powi(rank as i32 - 1)
}

/// Points relative to the best points observed on the leaderboard in the pool.
///
/// Leaderboards without a known maximum score 0 and therefore sort last.
pub fn relative_score_value(pp: f32, leaderboard_id: &str, pool: &ScorePool) -> f64 {
    let leaderboard_max = pool.meta(leaderboard_id).map(|m| m.max_pp).unwrap_or(0.0);

    if leaderboard_max == 0.0 {
        return 0.0;
    }

    pp as f64 / leaderboard_max
}

/// Picks the leaderboards that best represent a player, or falls back to
/// global filler leaderboards when the player has no usable pool history.
pub fn select_origins(pool: &ScorePool, player_id: &str, config: &SuggestConfig) -> OriginSelection {
    let played = pool
        .player(player_id)
        .map(|player| select_played_origins(player, pool, config))
        .unwrap_or_default();

    let mut leaderboard_ids: Vec<String> = played.into_iter().unique().collect();

    if !leaderboard_ids.is_empty() {
        leaderboard_ids.truncate(config.origin_cap);
        info!("Selected {} origin leaderboards from played scores", leaderboard_ids.len());

        return OriginSelection {
            leaderboard_ids,
            source: OriginSource::Played
        };
    }

    leaderboard_ids = filler_origins(pool, config)
        .into_iter()
        .unique()
        .take(config.origin_cap)
        .collect();

    if leaderboard_ids.is_empty() {
        warn!("No origin leaderboards available for player {}", player_id);
    } else {
        info!(
            "Player {} has no usable history, using {} filler leaderboards",
            player_id,
            leaderboard_ids.len()
        );
    }

    OriginSelection {
        leaderboard_ids,
        source: OriginSource::Filler
    }
}

/// Selects origin leaderboards from the player's own pool scores.
///
/// The worst quarter of the player's scores (by weighted value) is always
/// dropped. What remains is narrowed to the scores that are strongest relative
/// to the rest of the pool, then reordered by weighted value again.
pub fn select_played_origins(player: &PoolPlayer, pool: &ScorePool, config: &SuggestConfig) -> Vec<String> {
    let decay = config.recency_decay;
    let weighted = |s: &PoolScore| weighted_score_value(s.pp, s.rank, decay);

    let mut by_weight: Vec<&PoolScore> = player.scores.iter().collect();
    by_weight.sort_by(|a, b| weighted(b).total_cmp(&weighted(a)));

    // Rounded down, but a single available score is always kept
    let value_count = ((config.origin_retention * by_weight.len() as f64) as usize).max(1);

    let window = config.origin_window();
    let keep_fraction = if window == 0 {
        0.0
    } else {
        config.origin_cap as f64 / window as f64
    };
    let comparative_count = (keep_fraction * value_count as f64).ceil() as usize;

    debug!(
        "Origin selection for {}: {} scores, {} kept by value, {} kept by comparison",
        player.id,
        by_weight.len(),
        value_count,
        comparative_count
    );

    let mut candidates: Vec<&PoolScore> = by_weight.into_iter().take(value_count.min(window)).collect();
    candidates.sort_by(|a, b| {
        relative_score_value(b.pp, &b.leaderboard_id, pool)
            .total_cmp(&relative_score_value(a.pp, &a.leaderboard_id, pool))
    });
    candidates.truncate(comparative_count.min(config.origin_cap));

    candidates.sort_by(|a, b| weighted(b).total_cmp(&weighted(a)));
    candidates.into_iter().map(|s| s.leaderboard_id.clone()).collect()
}

/// Well-linked, comparatively easy leaderboards used when a player has no history.
///
/// Only leaderboards with at least `filler_min_links` pool scores are
/// considered. The easiest `filler_easiest_fraction` (by average points, plus
/// one) are kept and ordered by best average rank.
pub fn filler_origins(pool: &ScorePool, config: &SuggestConfig) -> Vec<String> {
    let mut candidates: Vec<_> = pool
        .meta
        .values()
        .filter(|m| m.count >= config.filler_min_links)
        .collect();
    candidates.sort_by(|a, b| a.average_pp.total_cmp(&b.average_pp));

    let target_count = (config.filler_easiest_fraction * candidates.len() as f64) as usize + 1;
    candidates.truncate(target_count);
    candidates.sort_by(|a, b| a.average_rank().total_cmp(&b.average_rank()));

    candidates
        .into_iter()
        .take(config.origin_cap)
        .map(|m| m.leaderboard_id.clone())
        .collect()
}
