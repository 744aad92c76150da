use super::db_structs::{Leaderboard, PlayedMap, Player, TopScore};
use crate::utils::progress_utils::progress_bar;
use indexmap::IndexMap;
use postgres_types::ToSql;
use std::sync::Arc;
use thiserror::Error;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Failed to connect to database: {0}")]
    Connection(#[source] tokio_postgres::Error),

    #[error("Database query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("Invalid value for {column}: {reason}")]
    InvalidValue { column: &'static str, reason: String }
}

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, DbError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls)
            .await
            .map_err(DbError::Connection)?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Fetches every player with positive points, ordered by global rank
    pub async fn get_players(&self) -> Result<Vec<Player>, DbError> {
        info!("Fetching players...");
        let rows = self
            .client
            .query(
                "SELECT p.id, p.name, p.rank, p.pp FROM players p WHERE p.pp > 0 ORDER BY p.rank, p.id",
                &[]
            )
            .await?;

        let players = rows.iter().map(Self::player_from_row).collect::<Result<Vec<_>, _>>()?;

        info!("{} players fetched", players.len());
        Ok(players)
    }

    /// Fetches the best `window` scores (points > 0) for every player,
    /// grouped by player and ordered by points descending.
    pub async fn get_top_scores(&self, window: usize) -> Result<IndexMap<String, Vec<TopScore>>, DbError> {
        info!("Fetching top {} scores per player...", window);
        let window = i64::try_from(window).map_err(|e| DbError::InvalidValue {
            column: "window",
            reason: e.to_string()
        })?;

        let params: &[&(dyn ToSql + Sync)] = &[&window];
        let rows = self
            .client
            .query(
                "SELECT player_id, leaderboard_id, pp FROM (
                    SELECT s.player_id, s.leaderboard_id, s.pp,
                           ROW_NUMBER() OVER (PARTITION BY s.player_id ORDER BY s.pp DESC, s.id) AS position
                    FROM scores s
                    WHERE s.pp > 0
                ) ranked
                WHERE position <= $1
                ORDER BY player_id, position",
                params
            )
            .await?;

        let bar = progress_bar(rows.len() as u64, "Decoding top scores".to_string());
        let mut scores: IndexMap<String, Vec<TopScore>> = IndexMap::new();
        for row in &rows {
            let score = Self::top_score_from_row(row)?;
            scores.entry(score.player_id.clone()).or_default().push(score);

            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish();
        }

        info!("Top scores fetched for {} players", scores.len());
        Ok(scores)
    }

    /// Fetches the full leaderboard catalog
    pub async fn get_leaderboards(&self) -> Result<Vec<Leaderboard>, DbError> {
        info!("Fetching leaderboards...");
        let rows = self
            .client
            .query(
                "SELECT l.id, l.hash, l.name, l.mapper, l.difficulty_name, l.mode_name, \
                 l.stars, l.acc_rating, l.tech_rating, l.pass_rating \
                 FROM leaderboards l ORDER BY l.id",
                &[]
            )
            .await?;

        let leaderboards = rows
            .iter()
            .map(Self::leaderboard_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        info!("{} leaderboards fetched", leaderboards.len());
        Ok(leaderboards)
    }

    /// Fetches every leaderboard the player has a score on, with the play time
    pub async fn get_played(&self, player_id: &str) -> Result<Vec<PlayedMap>, DbError> {
        let params: &[&(dyn ToSql + Sync)] = &[&player_id];
        let rows = self
            .client
            .query(
                "SELECT s.leaderboard_id, MAX(s.timeset) AS timeset FROM scores s \
                 WHERE s.player_id = $1 GROUP BY s.leaderboard_id ORDER BY s.leaderboard_id",
                params
            )
            .await?;

        let played = rows
            .iter()
            .map(|row| -> Result<PlayedMap, DbError> {
                Ok(PlayedMap {
                    leaderboard_id: row.try_get("leaderboard_id")?,
                    timeset: row.try_get("timeset")?
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Player {} has {} played leaderboards", player_id, played.len());
        Ok(played)
    }

    fn player_from_row(row: &Row) -> Result<Player, DbError> {
        Ok(Player {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            rank: row.try_get("rank")?,
            pp: row.try_get("pp")?
        })
    }

    fn top_score_from_row(row: &Row) -> Result<TopScore, DbError> {
        Ok(TopScore {
            player_id: row.try_get("player_id")?,
            leaderboard_id: row.try_get("leaderboard_id")?,
            pp: row.try_get("pp")?
        })
    }

    fn leaderboard_from_row(row: &Row) -> Result<Leaderboard, DbError> {
        Ok(Leaderboard {
            id: row.try_get("id")?,
            hash: row.try_get("hash")?,
            name: row.try_get("name")?,
            mapper: row.try_get("mapper")?,
            difficulty_name: row.try_get("difficulty_name")?,
            mode_name: row.try_get("mode_name")?,
            stars: row.try_get("stars")?,
            acc_rating: row.try_get("acc_rating")?,
            tech_rating: row.try_get("tech_rating")?,
            pass_rating: row.try_get("pass_rating")?
        })
    }
}
