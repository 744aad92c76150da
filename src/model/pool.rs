use std::collections::BTreeMap;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    database::db_structs::{Player, TopScore},
    model::structures::{
        pool::{MapMeta, PoolPlayer, PoolScore, ScorePool},
        suggest_config::SuggestConfig
    },
    utils::progress_utils::progress_bar
};

/// Selects the players whose best scores form the pool candidates.
///
/// A player qualifies when they have a full window of scores and their weakest
/// kept score is within `consistency_ratio` of their best. Players keep the
/// order they are given in (global rank order from the database) and their
/// scores are ranked 1..N by points.
pub fn select_candidates(
    players: &[Player],
    top_scores: &IndexMap<String, Vec<TopScore>>,
    config: &SuggestConfig
) -> Vec<PoolPlayer> {
    let candidates: Vec<PoolPlayer> = players
        .par_iter()
        .filter_map(|player| {
            let scores = top_scores.get(&player.id)?;
            candidate_from_scores(player, scores, config)
        })
        .collect();

    info!(
        "{} of {} players qualify as pool candidates",
        candidates.len(),
        players.len()
    );

    candidates
}

fn candidate_from_scores(player: &Player, scores: &[TopScore], config: &SuggestConfig) -> Option<PoolPlayer> {
    if scores.len() < config.candidate_window {
        return None;
    }

    let mut window: Vec<&TopScore> = scores.iter().collect();
    window.sort_by(|a, b| b.pp.total_cmp(&a.pp));
    window.truncate(config.candidate_window);

    let best = window.first()?.pp;
    let weakest = window.last()?.pp;
    if best <= 0.0 || weakest / best < config.consistency_ratio {
        return None;
    }

    Some(PoolPlayer {
        id: player.id.clone(),
        name: player.name.clone(),
        rank: player.rank,
        scores: window
            .into_iter()
            .enumerate()
            .map(|(i, s)| PoolScore {
                leaderboard_id: s.leaderboard_id.clone(),
                pp: s.pp,
                rank: i as u32 + 1,
                owner: 0
            })
            .collect()
    })
}

/// Aggregates per-leaderboard values over every score of the given players
pub fn generate_map_meta(players: &[PoolPlayer]) -> BTreeMap<String, MapMeta> {
    let mut meta: BTreeMap<String, MapMeta> = BTreeMap::new();

    for player in players {
        for score in &player.scores {
            meta.entry(score.leaderboard_id.clone())
                .or_insert_with(|| MapMeta::new(&score.leaderboard_id))
                .record(score);
        }
    }

    for m in meta.values_mut() {
        m.average_pp = if m.count > 0 { m.total_pp / m.count as f64 } else { 0.0 };
    }

    debug!("Map meta generated for {} leaderboards", meta.len());
    meta
}

/// Builds the capped, fairly distributed comparison pool.
///
/// Scores are grouped per leaderboard. Leaderboards with fewer candidates get
/// to claim players first (ties go to the stronger best score), then every
/// remaining leaderboard takes its strongest score whose owner still has room
/// under `player_cap`, round after round, until all candidates are used up.
/// Kept scores are finally re-ranked 1..N per player by points.
pub fn build_pool(mut players: Vec<PoolPlayer>, player_cap: usize) -> ScorePool {
    let meta = generate_map_meta(&players);

    // Group scores by leaderboard, remembering the owner by index
    let mut grouped: IndexMap<String, Vec<PoolScore>> = IndexMap::new();
    for (owner, player) in players.iter_mut().enumerate() {
        for mut score in player.scores.drain(..) {
            score.owner = owner;
            grouped.entry(score.leaderboard_id.clone()).or_default().push(score);
        }
    }

    // Weakest first, so the strongest candidate is always popped from the end
    let mut remaining: Vec<(String, Vec<PoolScore>)> = grouped.into_iter().collect();
    remaining
        .par_iter_mut()
        .for_each(|(_, scores)| scores.sort_by(|a, b| a.pp.total_cmp(&b.pp)));

    remaining.sort_by(|(_, a), (_, b)| {
        let strongest_a = a.last().map(|s| s.pp).unwrap_or(0.0);
        let strongest_b = b.last().map(|s| s.pp).unwrap_or(0.0);

        a.len()
            .cmp(&b.len())
            .then_with(|| strongest_b.total_cmp(&strongest_a))
    });

    let total: usize = remaining.iter().map(|(_, s)| s.len()).sum();
    let bar = progress_bar(total as u64, "Assigning pool scores".to_string());
    let mut used = vec![0usize; players.len()];
    let mut rounds = 0usize;

    while !remaining.is_empty() {
        for (_, entries) in remaining.iter_mut() {
            // Drop candidates whose owner is already full
            while entries.last().is_some_and(|s| used[s.owner] >= player_cap) {
                entries.pop();
            }

            if let Some(score) = entries.pop() {
                used[score.owner] += 1;
                players[score.owner].scores.push(score);
            }
        }

        remaining.retain(|(_, entries)| !entries.is_empty());
        rounds += 1;

        if let Some(bar) = &bar {
            bar.set_position((total - remaining.iter().map(|(_, s)| s.len()).sum::<usize>()) as u64);
        }
    }

    if let Some(bar) = bar {
        bar.finish();
    }

    for player in players.iter_mut() {
        rerank(&mut player.scores);
    }

    let pool = ScorePool { players, meta };
    info!(
        "Pool built: {} players, {} scores, {} leaderboards, {} rounds",
        pool.players.len(),
        pool.score_count(),
        pool.meta.len(),
        rounds
    );

    pool
}

/// Sorts scores by points descending and assigns dense 1..N ranks
pub fn rerank(scores: &mut [PoolScore]) {
    scores.sort_by(|a, b| b.pp.total_cmp(&a.pp));

    for (i, score) in scores.iter_mut().enumerate() {
        score.rank = i as u32 + 1;
    }
}
