use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    model::{
        constants::DISTANCE_EXPONENT,
        structures::{
            endpoint::{Endpoint, EndpointCollection},
            link::{Link, LinkedScore},
            pool::{PoolPlayer, PoolScore, ScorePool}
        }
    },
    utils::progress_utils::progress_bar
};

/// Surviving links plus the two endpoint collections they point into
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkGraph {
    pub links: Vec<Link>,
    /// Keyed by origin leaderboard, in origin selection order
    pub origins: EndpointCollection,
    /// Keyed by target leaderboard, in order of first appearance among the links
    pub targets: EndpointCollection,
    /// Distinct players owning at least one surviving link
    pub linked_players: usize
}

impl LinkGraph {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn origin_of(&self, link: &Link) -> Option<&Endpoint> {
        self.origins.get(link.origin_endpoint)
    }

    pub fn target_of(&self, link: &Link) -> Option<&Endpoint> {
        self.targets.get(link.target_endpoint)
    }
}

struct Candidate<'a> {
    player: &'a PoolPlayer,
    origin: &'a PoolScore,
    target: &'a PoolScore,
    distance: f64
}

/// How far apart two scores of the same player are. Lower is better.
///
/// An origin worth 0 points always matches perfectly.
pub fn distance(origin_pp: f32, target_pp: f32) -> f64 {
    if origin_pp == 0.0 {
        return 0.0;
    }

    ((target_pp as f64 / origin_pp as f64).powi(DISTANCE_EXPONENT) - 1.0).abs()
}

/// Links every origin score of every other pool player to that player's
/// remaining scores, then keeps the closest `survival` fraction (rounded up).
pub fn generate_links(pool: &ScorePool, player_id: &str, origin_ids: &[String], survival: f64) -> LinkGraph {
    let origin_set: HashSet<&str> = origin_ids.iter().map(String::as_str).collect();

    let others: Vec<&PoolPlayer> = pool.players.iter().filter(|p| p.id != player_id).collect();
    let bar = progress_bar(others.len() as u64, "Generating links".to_string());

    let mut candidates: Vec<Candidate> = others
        .par_iter()
        .flat_map_iter(|player| {
            let links = player_candidates(player, &origin_set);
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            links
        })
        .collect();

    if let Some(bar) = bar {
        bar.finish();
    }

    let total = candidates.len();
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate((total as f64 * survival).ceil() as usize);

    debug!("{} of {} candidate links survived", candidates.len(), total);

    let origins = EndpointCollection::from_ids(origin_ids);
    let targets = EndpointCollection::from_ids(candidates.iter().map(|c| c.target.leaderboard_id.as_str()));

    let graph = assemble(candidates, origins, targets);
    info!(
        "Link graph built: {} links, {} origins, {} targets, {} linked players",
        graph.links.len(),
        graph.origins.len(),
        graph.targets.len(),
        graph.linked_players
    );

    graph
}

fn player_candidates<'a>(player: &'a PoolPlayer, origin_set: &HashSet<&str>) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::new();

    for origin in player
        .scores
        .iter()
        .filter(|s| origin_set.contains(s.leaderboard_id.as_str()))
    {
        for target in player.scores.iter().filter(|s| s.rank != origin.rank) {
            candidates.push(Candidate {
                player,
                origin,
                target,
                distance: distance(origin.pp, target.pp)
            });
        }
    }

    candidates
}

fn assemble(candidates: Vec<Candidate>, mut origins: EndpointCollection, mut targets: EndpointCollection) -> LinkGraph {
    let mut links = Vec::with_capacity(candidates.len());
    let mut players: HashSet<&str> = HashSet::new();

    for c in candidates {
        // Both collections are built from the same ids the candidates carry
        let (Some(origin_endpoint), Some(target_endpoint)) = (
            origins.index_of(&c.origin.leaderboard_id),
            targets.index_of(&c.target.leaderboard_id)
        ) else {
            continue;
        };

        let index = links.len();
        if let Some(e) = origins.get_mut(origin_endpoint) {
            e.links.push(index);
        }
        if let Some(e) = targets.get_mut(target_endpoint) {
            e.links.push(index);
        }

        players.insert(c.player.id.as_str());
        links.push(Link {
            player_id: c.player.id.clone(),
            origin: LinkedScore::from(c.origin),
            target: LinkedScore::from(c.target),
            distance: c.distance,
            origin_endpoint,
            target_endpoint
        });
    }

    LinkGraph {
        linked_players: players.len(),
        links,
        origins,
        targets
    }
}
