use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{
    endpoints::aggregate,
    fusion::{fuse, ignored_maps, order_filters, select_suggestions},
    links::generate_links,
    origin::select_origins,
    structures::{
        history::PlayerHistory,
        pool::ScorePool,
        processing::{RankedSuggestion, Stage},
        suggest_config::SuggestConfig
    }
};

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Suggestion run exceeded its time budget at stage {stage} after {elapsed:?}")]
    BudgetExceeded { stage: Stage, elapsed: Duration }
}

/// Wall-clock limit for one run, checked after every stage
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    started: Instant,
    limit: Option<Duration>
}

impl Budget {
    pub fn unlimited() -> Budget {
        Budget {
            started: Instant::now(),
            limit: None
        }
    }

    pub fn new(limit: Duration) -> Budget {
        Budget {
            started: Instant::now(),
            limit: Some(limit)
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn check(&self, stage: Stage) -> Result<(), SuggestError> {
        let elapsed = self.elapsed();
        debug!("Stage {} finished after {:?}", stage, elapsed);

        match self.limit {
            Some(limit) if elapsed > limit => {
                warn!("Budget of {:?} exceeded at stage {}", limit, stage);
                Err(SuggestError::BudgetExceeded { stage, elapsed })
            }
            _ => Ok(())
        }
    }
}

/// Runs the ranked suggestion pipeline against one pool snapshot
pub struct RankedSuggester<'a> {
    pool: &'a ScorePool,
    config: &'a SuggestConfig,
    limit: Option<Duration>
}

impl<'a> RankedSuggester<'a> {
    pub fn new(pool: &'a ScorePool, config: &'a SuggestConfig) -> RankedSuggester<'a> {
        RankedSuggester {
            pool,
            config,
            limit: None
        }
    }

    pub fn with_budget(mut self, limit: Duration) -> RankedSuggester<'a> {
        self.limit = Some(limit);
        self
    }

    fn budget(&self) -> Budget {
        match self.limit {
            Some(limit) => Budget::new(limit),
            None => Budget::unlimited()
        }
    }

    /// Suggests leaderboards for `player_id`, best first.
    ///
    /// An empty suggestion list is a valid outcome. Exceeding the budget
    /// discards everything computed so far.
    pub fn suggest(
        &self,
        player_id: &str,
        history: &PlayerHistory,
        now: DateTime<Utc>
    ) -> Result<RankedSuggestion, SuggestError> {
        let budget = self.budget();
        let config = self.config;

        let origins = select_origins(self.pool, player_id, config);
        budget.check(Stage::OriginSelection)?;

        let graph = generate_links(self.pool, player_id, &origins.leaderboard_ids, config.link_survival);
        budget.check(Stage::LinkGeneration)?;

        let graph = aggregate(graph, config);
        budget.check(Stage::Aggregation)?;

        let orderings = order_filters(&graph, self.pool);
        budget.check(Stage::FilterRanking)?;

        let fused = fuse(&orderings, config);
        budget.check(Stage::Fusion)?;

        let ignored = ignored_maps(&fused, self.pool, player_id, history, config, now);
        let suggestions = select_suggestions(&fused, &ignored, history, config);
        budget.check(Stage::Filtering)?;

        info!(
            "Suggested {} maps for player {} in {:?}",
            suggestions.len(),
            player_id,
            budget.elapsed()
        );

        Ok(RankedSuggestion {
            player_id: player_id.to_string(),
            origins,
            link_count: graph.links.len(),
            linked_players: graph.linked_players,
            orderings,
            fused,
            suggestions
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Budget, RankedSuggester, SuggestError};
    use crate::{
        model::{
            pool::build_pool,
            structures::{
                history::PlayerHistory,
                processing::{OriginSource, Stage},
                suggest_config::SuggestConfig
            }
        },
        utils::test_utils::{generate_candidates, generate_history}
    };
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_unlimited_budget_never_fails() {
        let budget = Budget::unlimited();

        assert!(budget.check(Stage::Filtering).is_ok());
    }

    #[test]
    fn test_exceeded_budget() {
        let budget = Budget::new(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));

        match budget.check(Stage::Fusion) {
            Err(SuggestError::BudgetExceeded { stage, .. }) => assert_eq!(stage, Stage::Fusion),
            other => panic!("Expected budget error, got {:?}", other)
        }
    }

    #[test]
    fn test_exceeded_budget_returns_nothing() {
        let pool = build_pool(generate_candidates(20, 40, 30, 8), 20);
        let config = SuggestConfig::default();

        let result = RankedSuggester::new(&pool, &config)
            .with_budget(Duration::ZERO)
            .suggest(&pool.players[0].id, &PlayerHistory::default(), Utc::now());

        assert!(result.is_err());
    }

    #[test]
    fn test_suggest_for_pool_player() {
        let pool = build_pool(generate_candidates(40, 60, 30, 3), 20);
        let config = SuggestConfig::default();
        let player = &pool.players[5];
        let played: Vec<(&str, Option<chrono::DateTime<Utc>>)> =
            player.scores.iter().map(|s| (s.leaderboard_id.as_str(), None)).collect();
        let history = generate_history(&played);

        let result = RankedSuggester::new(&pool, &config)
            .suggest(&player.id, &history, Utc::now())
            .unwrap();

        assert_eq!(result.origins.source, OriginSource::Played);
        assert!(result.link_count > 0);
        assert!(result.linked_players > 0);
        assert!(!result.is_empty());
        assert!(result.suggestions.len() <= config.suggestion_count);
        assert!(result.suggestions.iter().all(|id| !history.has_played(id)));
    }

    #[test]
    fn test_suggest_is_idempotent() {
        let pool = build_pool(generate_candidates(30, 50, 30, 4), 20);
        let config = SuggestConfig::default();
        let suggester = RankedSuggester::new(&pool, &config);
        let now = Utc::now();

        let first = suggester.suggest(&pool.players[2].id, &PlayerHistory::default(), now).unwrap();
        let second = suggester.suggest(&pool.players[2].id, &PlayerHistory::default(), now).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_player_uses_filler() {
        let pool = build_pool(generate_candidates(60, 40, 30, 6), 20);
        let config = SuggestConfig::default();

        let result = RankedSuggester::new(&pool, &config)
            .suggest("newcomer", &PlayerHistory::default(), Utc::now())
            .unwrap();

        assert_eq!(result.origins.source, OriginSource::Filler);
        assert!(!result.origins.leaderboard_ids.is_empty());
    }

    #[test]
    fn test_empty_pool_gives_empty_suggestion() {
        let pool = build_pool(Vec::new(), 20);
        let config = SuggestConfig::default();

        let result = RankedSuggester::new(&pool, &config)
            .suggest("anyone", &PlayerHistory::default(), Utc::now())
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.link_count, 0);
    }
}
