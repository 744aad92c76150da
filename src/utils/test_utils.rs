use crate::{
    database::db_structs::{Leaderboard, PlayedMap, Player, TopScore},
    model::structures::{
        history::PlayerHistory,
        pool::{PoolPlayer, PoolScore}
    }
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builds a pool player whose scores are ranked 1..N in the order given
pub fn generate_pool_player(id: &str, rank: i32, scores: &[(&str, f32)]) -> PoolPlayer {
    PoolPlayer {
        id: id.to_string(),
        name: Some(format!("Player {}", id)),
        rank,
        scores: scores
            .iter()
            .enumerate()
            .map(|(i, (leaderboard_id, pp))| PoolScore {
                leaderboard_id: leaderboard_id.to_string(),
                pp: *pp,
                rank: i as u32 + 1,
                owner: 0
            })
            .collect()
    }
}

/// Generates `n_players` consistent pool candidates ("p0".."pN") with
/// `per_player` distinct scores each, drawn from maps "m0".."mM".
///
/// Stronger players (lower index) get higher points. Every player's weakest
/// score stays within 75% of their best, so all of them pass the
/// consistency check.
pub fn generate_candidates(n_players: usize, n_maps: usize, per_player: usize, seed: u64) -> Vec<PoolPlayer> {
    if per_player > n_maps {
        panic!("Cannot give each player more distinct maps than exist");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maps: Vec<String> = (0..n_maps).map(|j| format!("m{}", j)).collect();

    (0..n_players)
        .map(|i| {
            let base = 800.0 / (1.0 + i as f32 * 0.01);

            let mut picked = maps.clone();
            picked.shuffle(&mut rng);
            picked.truncate(per_player);

            let mut scores: Vec<(String, f32)> = picked
                .into_iter()
                .map(|m| (m, base * rng.random_range(0.75f32..=1.0)))
                .collect();
            scores.sort_by(|a, b| b.1.total_cmp(&a.1));

            let refs: Vec<(&str, f32)> = scores.iter().map(|(m, pp)| (m.as_str(), *pp)).collect();
            generate_pool_player(&format!("p{}", i), i as i32 + 1, &refs)
        })
        .collect()
}

/// Database-shaped players and top scores matching [`generate_candidates`]
pub fn generate_db_candidates(
    n_players: usize,
    n_maps: usize,
    per_player: usize,
    seed: u64
) -> (Vec<Player>, IndexMap<String, Vec<TopScore>>) {
    let candidates = generate_candidates(n_players, n_maps, per_player, seed);

    let players = candidates
        .iter()
        .map(|c| Player {
            id: c.id.clone(),
            name: c.name.clone(),
            rank: c.rank,
            pp: c.scores.iter().map(|s| s.pp).sum()
        })
        .collect();

    let scores = candidates
        .iter()
        .map(|c| {
            let top = c
                .scores
                .iter()
                .map(|s| TopScore {
                    player_id: c.id.clone(),
                    leaderboard_id: s.leaderboard_id.clone(),
                    pp: s.pp
                })
                .collect();
            (c.id.clone(), top)
        })
        .collect();

    (players, scores)
}

pub fn generate_leaderboard(id: &str, acc_rating: f32, tech_rating: f32, pass_rating: f32) -> Leaderboard {
    Leaderboard {
        id: id.to_string(),
        hash: format!("{}hash", id.to_uppercase()),
        name: format!("Song {}", id),
        mapper: format!("Mapper {}", id),
        difficulty_name: "ExpertPlus".to_string(),
        mode_name: "Standard".to_string(),
        stars: (acc_rating + tech_rating + pass_rating) / 3.0,
        acc_rating,
        tech_rating,
        pass_rating
    }
}

/// A leaderboard catalog covering maps "m0".."mN" with random ratings
pub fn generate_catalog(n_maps: usize, seed: u64) -> Vec<Leaderboard> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..n_maps)
        .map(|j| {
            generate_leaderboard(
                &format!("m{}", j),
                rng.random_range(1.0..=15.0),
                rng.random_range(1.0..=15.0),
                rng.random_range(1.0..=15.0)
            )
        })
        .collect()
}

pub fn generate_history(played: &[(&str, Option<DateTime<Utc>>)]) -> PlayerHistory {
    let played: Vec<PlayedMap> = played
        .iter()
        .map(|(id, timeset)| PlayedMap {
            leaderboard_id: id.to_string(),
            timeset: *timeset
        })
        .collect();

    PlayerHistory::new(&played)
}
