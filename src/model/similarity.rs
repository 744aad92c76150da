use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    database::db_structs::Leaderboard,
    model::structures::{history::PlayerHistory, suggest_config::SimilarityConfig}
};

/// The three difficulty dimensions of a map scaled to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedRatings {
    pub acc: f64,
    pub tech: f64,
    pub pass: f64
}

impl NormalizedRatings {
    pub fn from_leaderboard(leaderboard: &Leaderboard, ceiling: f64) -> NormalizedRatings {
        let scale = |rating: f32| if ceiling > 0.0 { rating as f64 / ceiling } else { 0.0 };

        NormalizedRatings {
            acc: scale(leaderboard.acc_rating),
            tech: scale(leaderboard.tech_rating),
            pass: scale(leaderboard.pass_rating)
        }
    }

    fn differences(&self, other: &NormalizedRatings) -> [f64; 3] {
        [
            (self.acc - other.acc).abs(),
            (self.tech - other.tech).abs(),
            (self.pass - other.pass).abs()
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    pub leaderboard_id: String,
    pub similarity: f64
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityOutcome {
    /// Best first
    pub matches: Vec<SimilarityMatch>,
    /// Tolerance the returned matches were found at
    pub tolerance: f64,
    /// Tolerance levels examined
    pub iterations: usize,
    pub reached_target: bool
}

impl SimilarityOutcome {
    pub fn leaderboard_ids(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.leaderboard_id.clone()).collect()
    }
}

/// Similarity of a candidate to one reference, if enough dimensions are within `tolerance`.
///
/// The summed difference is divided by the number of matching dimensions.
pub fn similarity(
    candidate: &NormalizedRatings,
    reference: &NormalizedRatings,
    tolerance: f64,
    min_dimensions: usize
) -> Option<f64> {
    let differences = candidate.differences(reference);
    let matched = differences.iter().filter(|&&d| d <= tolerance).count();

    if matched == 0 || matched < min_dimensions {
        return None;
    }

    Some(1.0 - differences.iter().sum::<f64>() / matched as f64)
}

/// Candidates matching at least one reference at `tolerance`, best first, at most `limit`
pub fn similar_maps(
    references: &[NormalizedRatings],
    candidates: &[(&str, NormalizedRatings)],
    tolerance: f64,
    min_dimensions: usize,
    limit: usize
) -> Vec<SimilarityMatch> {
    let mut matches: Vec<SimilarityMatch> = candidates
        .par_iter()
        .filter_map(|(id, ratings)| {
            let mut best: Option<f64> = None;
            for reference in references {
                if let Some(s) = similarity(ratings, reference, tolerance, min_dimensions) {
                    best = Some(best.unwrap_or(0.0).max(s));
                }
            }

            best.map(|similarity| SimilarityMatch {
                leaderboard_id: id.to_string(),
                similarity
            })
        })
        .collect();

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(limit);
    matches
}

/// Finds maps rated like the player's reference maps, widening the tolerance
/// step by step until `match_target` matches are found or the ceiling is reached.
///
/// A looser tolerance only replaces the best result so far when it yields more
/// matches. Never reaching the target is not an error.
pub fn recommend_similar(
    reference_ids: &[String],
    catalog: &[Leaderboard],
    history: &PlayerHistory,
    config: &SimilarityConfig
) -> SimilarityOutcome {
    let reference_set: HashSet<&str> = reference_ids.iter().map(String::as_str).collect();

    let references: Vec<NormalizedRatings> = catalog
        .iter()
        .filter(|l| reference_set.contains(l.id.as_str()))
        .map(|l| NormalizedRatings::from_leaderboard(l, config.rating_ceiling))
        .collect();

    if references.is_empty() {
        warn!("None of the {} reference maps are in the catalog", reference_ids.len());
        return SimilarityOutcome::default();
    }

    let candidates: Vec<(&str, NormalizedRatings)> = catalog
        .iter()
        .filter(|l| !reference_set.contains(l.id.as_str()))
        .filter(|l| !config.unplayed_only || !history.has_played(&l.id))
        .map(|l| (l.id.as_str(), NormalizedRatings::from_leaderboard(l, config.rating_ceiling)))
        .collect();

    debug!(
        "Matching {} candidates against {} references",
        candidates.len(),
        references.len()
    );

    let mut best = SimilarityOutcome::default();
    let max_iterations = config.max_iterations();

    for iteration in 0..max_iterations {
        let tolerance = config.tolerance_at(iteration);
        let matches = similar_maps(
            &references,
            &candidates,
            tolerance,
            config.min_dimensions,
            config.match_target
        );
        debug!("Tolerance {:.2}: {} matches", tolerance, matches.len());

        if matches.len() >= config.match_target {
            info!("Found {} similar maps at tolerance {:.2}", matches.len(), tolerance);
            return SimilarityOutcome {
                matches,
                tolerance,
                iterations: iteration + 1,
                reached_target: true
            };
        }

        if matches.len() > best.matches.len() {
            best.matches = matches;
            best.tolerance = tolerance;
        }
        best.iterations = iteration + 1;
    }

    info!(
        "Found {} of {} similar maps after {} tolerance levels",
        best.matches.len(),
        config.match_target,
        best.iterations
    );

    best
}
