use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::info;

use crate::{
    database::db_structs::{Player, TopScore},
    model::{
        pool::{build_pool, select_candidates},
        structures::{pool::ScorePool, suggest_config::SuggestConfig}
    }
};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("A pool rebuild is already in progress")]
    RebuildInProgress
}

/// The published comparison pool.
///
/// Readers take a cheap snapshot and keep using it even while a rebuild
/// publishes a newer one. Only one rebuild runs at a time.
#[derive(Debug, Default)]
pub struct SharedPool {
    current: RwLock<Arc<ScorePool>>,
    rebuild: Mutex<()>
}

impl SharedPool {
    pub fn new(pool: ScorePool) -> SharedPool {
        SharedPool {
            current: RwLock::new(Arc::new(pool)),
            rebuild: Mutex::new(())
        }
    }

    pub fn snapshot(&self) -> Arc<ScorePool> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Rebuilds the pool from fresh data and publishes it.
    ///
    /// Fails immediately if another rebuild holds the lock.
    pub fn rebuild(
        &self,
        players: &[Player],
        top_scores: &IndexMap<String, Vec<TopScore>>,
        config: &SuggestConfig
    ) -> Result<Arc<ScorePool>, PoolError> {
        let _guard = match self.rebuild.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(PoolError::RebuildInProgress)
        };

        let candidates = select_candidates(players, top_scores, config);
        let pool = Arc::new(build_pool(candidates, config.pool_player_cap));

        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::clone(&pool);
        }

        info!(
            "Published pool with {} players and {} scores",
            pool.players.len(),
            pool.score_count()
        );

        Ok(pool)
    }
}
