use indexmap::IndexMap;
use tracing::debug;

use crate::model::{
    links::LinkGraph,
    structures::{endpoint::EndpointCollection, link::Link, suggest_config::SuggestConfig}
};

/// Fills in relevance on both endpoint collections and style on the targets
pub fn aggregate(mut graph: LinkGraph, config: &SuggestConfig) -> LinkGraph {
    apply_relevance(&mut graph.origins, &graph.links, config);
    apply_relevance(&mut graph.targets, &graph.links, config);
    apply_style(&mut graph);

    debug!(
        "Aggregated {} origin and {} target endpoints",
        graph.origins.len(),
        graph.targets.len()
    );

    graph
}

/// Padded average of linked target ranks.
///
/// Endpoints with fewer than `min_links` links are padded with `neutral_rank`
/// up to `min_links` samples.
pub fn relevance(rank_sum: f64, link_count: usize, min_links: usize, neutral_rank: f64) -> f64 {
    let missing = min_links.saturating_sub(link_count);
    let denominator = min_links.max(link_count);

    if denominator == 0 {
        return 0.0;
    }

    (rank_sum + missing as f64 * neutral_rank) / denominator as f64
}

fn apply_relevance(endpoints: &mut EndpointCollection, links: &[Link], config: &SuggestConfig) {
    for endpoint in endpoints.iter_mut() {
        let rank_sum: f64 = endpoint
            .links
            .iter()
            .filter_map(|&i| links.get(i))
            .map(|l| l.target.rank as f64)
            .sum();

        endpoint.rank_sum = rank_sum;
        endpoint.relevance = relevance(
            rank_sum,
            endpoint.links.len(),
            config.relevance_min_links,
            config.neutral_rank
        );
    }
}

/// For every target, the share of each feeding origin's links that land on it, summed
fn apply_style(graph: &mut LinkGraph) {
    let origins = &graph.origins;
    let links = &graph.links;

    for target in graph.targets.iter_mut() {
        let mut per_origin: IndexMap<usize, usize> = IndexMap::new();
        for link in target.links.iter().filter_map(|&i| links.get(i)) {
            *per_origin.entry(link.origin_endpoint).or_default() += 1;
        }

        target.style = per_origin
            .into_iter()
            .map(|(origin, count)| {
                let origin_total = origins.get(origin).map(|e| e.links.len()).unwrap_or(0);
                if origin_total == 0 {
                    0.0
                } else {
                    count as f64 / origin_total as f64
                }
            })
            .sum();
    }
}
