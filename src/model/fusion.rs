use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::model::{
    links::LinkGraph,
    structures::{
        history::PlayerHistory,
        pool::ScorePool,
        processing::{FilterOrderings, FusedScore},
        suggest_config::{PlayedFilter, SuggestConfig}
    }
};

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Produces the style and overweight orderings over the target endpoints, best first.
///
/// Style ranks a map by its pool play count over its style score, so maps that
/// are reached broadly but are not generally popular come first. Overweight
/// ranks by relevance. Both sorts are stable over target order.
pub fn order_filters(graph: &LinkGraph, pool: &ScorePool) -> FilterOrderings {
    let mut style: Vec<(&str, f64)> = graph
        .targets
        .iter()
        .map(|e| {
            let count = pool.meta(&e.leaderboard_id).map(|m| m.count).unwrap_or(0);
            // No style share ranks last
            let value = if e.style == 0.0 {
                f64::INFINITY
            } else {
                count as f64 / e.style
            };
            (e.leaderboard_id.as_str(), value)
        })
        .collect();
    style.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut overweight: Vec<(&str, f64)> = graph
        .targets
        .iter()
        .map(|e| (e.leaderboard_id.as_str(), e.relevance))
        .collect();
    overweight.sort_by(|a, b| a.1.total_cmp(&b.1));

    FilterOrderings {
        style: style.into_iter().map(|(id, _)| id.to_string()).collect(),
        overweight: overweight.into_iter().map(|(id, _)| id.to_string()).collect()
    }
}

/// Remaps a [0, 1] position fraction onto a band centred on 1 whose width is `weight`
pub fn spread(fraction: f64, weight: f64) -> f64 {
    fraction * weight + (1.0 - 0.5 * weight)
}

/// Combines both orderings into a single one, lowest score first.
///
/// Positions become fractions of the overweight ordering's length. A map
/// missing from the overweight ordering is treated as its best entry.
pub fn fuse(orderings: &FilterOrderings, config: &SuggestConfig) -> Vec<FusedScore> {
    let (style_weight, overweight_weight) = config.effective_weights();
    let span = orderings.overweight.len().saturating_sub(1) as f64;

    let overweight_positions: HashMap<&str, usize> = orderings
        .overweight
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut missing = 0usize;
    let mut fused: Vec<FusedScore> = orderings
        .style
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let style_fraction = ratio_or_zero(i as f64, span);
            let overweight_fraction = match overweight_positions.get(id.as_str()) {
                Some(&position) => ratio_or_zero(position as f64, span),
                None => {
                    missing += 1;
                    0.0
                }
            };

            FusedScore {
                leaderboard_id: id.clone(),
                style_fraction,
                overweight_fraction,
                score: spread(style_fraction, style_weight) * spread(overweight_fraction, overweight_weight)
            }
        })
        .collect();

    if missing > 0 {
        warn!("{} maps were absent from the overweight ordering and scored as its best entry", missing);
    }

    fused.sort_by(|a, b| a.score.total_cmp(&b.score));
    debug!("Fused {} maps", fused.len());

    fused
}

/// Leaderboards removed from the fused ordering before the final cut
pub fn ignored_maps(
    fused: &[FusedScore],
    pool: &ScorePool,
    player_id: &str,
    history: &PlayerHistory,
    config: &SuggestConfig,
    now: DateTime<Utc>
) -> HashSet<String> {
    let mut ignored: HashSet<String> = match config.played_filter {
        PlayedFilter::AllTime => history.played_ids().map(str::to_string).collect(),
        PlayedFilter::WithinDays(days) => history.played_within(days, now).map(str::to_string).collect(),
        PlayedFilter::Off => HashSet::new()
    };
    let played = ignored.len();

    if config.ignore_non_improvable {
        if let Some(player) = pool.player(player_id) {
            for (i, f) in fused.iter().enumerate() {
                let fused_rank = i + 1;
                let improvable = player
                    .rank_on(&f.leaderboard_id)
                    .map_or(true, |current| current as usize >= fused_rank + config.improvement_margin);

                if !improvable {
                    ignored.insert(f.leaderboard_id.clone());
                }
            }
        }
    }

    debug!(
        "Ignoring {} maps ({} by play history)",
        ignored.len(),
        played
    );

    ignored
}

/// Drops ignored (and, when requested, already played) maps and keeps the best `suggestion_count`
pub fn select_suggestions(
    fused: &[FusedScore],
    ignored: &HashSet<String>,
    history: &PlayerHistory,
    config: &SuggestConfig
) -> Vec<String> {
    let suggestions: Vec<String> = fused
        .iter()
        .map(|f| &f.leaderboard_id)
        .filter(|id| !ignored.contains(id.as_str()))
        .filter(|id| !config.unplayed_only || !history.has_played(id))
        .take(config.suggestion_count)
        .cloned()
        .collect();

    info!("{} of {} fused maps suggested", suggestions.len(), fused.len());
    suggestions
}
