use chrono::{TimeZone, Utc};
use map_recommender::{
    database::db::DbClient,
    model::{
        pool::{build_pool, select_candidates},
        structures::{history::PlayerHistory, suggest_config::SuggestConfig}
    }
};
use serial_test::serial;

use super::test_helpers::TestDatabase;
use crate::common::init_test_env;

async fn seeded() -> (TestDatabase, DbClient) {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    (test_db, db_client)
}

#[tokio::test]
#[serial]
async fn test_get_players() {
    let (_db, client) = seeded().await;

    let players = client.get_players().await.unwrap();

    assert_eq!(players.len(), 3);
    assert_eq!(players[0].id, "1");
    assert_eq!(players[0].name, Some("First".to_string()));
    assert_eq!(players[2].name, None);
    assert_eq!(players[2].rank, 3);
}

#[tokio::test]
#[serial]
async fn test_get_top_scores_window() {
    let (_db, client) = seeded().await;

    let scores = client.get_top_scores(3).await.unwrap();

    let first = scores.get("1").unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(
        first.iter().map(|s| s.leaderboard_id.as_str()).collect::<Vec<_>>(),
        vec!["l1", "l2", "l3"]
    );
    assert!(first.iter().all(|s| s.pp > 0.0));
    assert_eq!(scores.get("3").unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_get_leaderboards() {
    let (_db, client) = seeded().await;

    let leaderboards = client.get_leaderboards().await.unwrap();

    assert_eq!(leaderboards.len(), 5);
    assert_eq!(leaderboards[0].id, "l1");
    assert_eq!(leaderboards[0].hash, "H1");
    assert_eq!(leaderboards[2].mode_name, "OneSaber");
    assert_eq!(leaderboards[3].acc_rating, 12.5);
}

#[tokio::test]
#[serial]
async fn test_get_played_keeps_latest_play() {
    let (_db, client) = seeded().await;

    let played = client.get_played("1").await.unwrap();

    assert_eq!(played.len(), 5);
    let l5 = played.iter().find(|p| p.leaderboard_id == "l5").unwrap();
    assert_eq!(l5.timeset, Some(Utc.with_ymd_and_hms(2024, 2, 4, 12, 0, 0).unwrap()));
    let l4 = played.iter().find(|p| p.leaderboard_id == "l4").unwrap();
    assert_eq!(l4.timeset, None);

    let history = PlayerHistory::new(&played);
    assert!(history.has_played("l5"));
    assert!(!PlayerHistory::new(&client.get_played("4").await.unwrap()).has_played("l1"));
}

#[tokio::test]
#[serial]
async fn test_pool_from_database() {
    let (_db, client) = seeded().await;
    let config = SuggestConfig {
        candidate_window: 2,
        ..Default::default()
    };

    let players = client.get_players().await.unwrap();
    let scores = client.get_top_scores(config.candidate_window).await.unwrap();
    let pool = build_pool(select_candidates(&players, &scores, &config), config.pool_player_cap);

    // Player 3 has a single score and cannot fill the window
    assert_eq!(pool.players.len(), 2);
    assert!(pool.player("3").is_none());
    assert_eq!(pool.meta("l1").unwrap().count, 2);
}
