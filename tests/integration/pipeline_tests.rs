use chrono::Utc;
use map_recommender::{
    export::json::JsonFileExporter,
    model::{
        playlist::build_playlist,
        shared_pool::SharedPool,
        similarity::recommend_similar,
        structures::{
            history::PlayerHistory,
            playlist::Playlist,
            processing::OriginSource,
            suggest_config::{SimilarityConfig, SuggestConfig}
        },
        suggest::RankedSuggester
    },
    utils::test_utils::{generate_catalog, generate_db_candidates, generate_history}
};
use std::{sync::Arc, thread};

use crate::common::init_test_env;

#[tokio::test]
async fn test_ranked_run_to_playlist_file() {
    init_test_env();
    let config = SuggestConfig::default();
    let (players, scores) = generate_db_candidates(50, 80, 30, 99);
    let catalog = generate_catalog(80, 99);

    let shared = SharedPool::default();
    let pool = shared.rebuild(&players, &scores, &config).unwrap();
    let player = &pool.players[3];
    let played: Vec<_> = player.scores.iter().map(|s| (s.leaderboard_id.as_str(), None)).collect();
    let history = generate_history(&played);

    let suggestion = RankedSuggester::new(&pool, &config)
        .suggest(&player.id, &history, Utc::now())
        .unwrap();

    assert_eq!(suggestion.origins.source, OriginSource::Played);
    assert!(!suggestion.is_empty());

    let playlist = build_playlist(
        &player.id,
        &suggestion.suggestions,
        &catalog,
        &config.playlist_author,
        config.suggestion_count
    );
    assert_eq!(playlist.songs.len(), suggestion.suggestions.len());

    let dir = tempfile::tempdir().unwrap();
    let path = JsonFileExporter::new(dir.path())
        .export(&playlist, &player.id, Utc::now())
        .await
        .unwrap();

    let written: Playlist = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written.songs[0].hash, playlist.songs[0].hash);
}

#[test]
fn test_ranked_run_is_repeatable() {
    init_test_env();
    let config = SuggestConfig::default();
    let (players, scores) = generate_db_candidates(40, 60, 30, 5);
    let now = Utc::now();

    let first_pool = SharedPool::default().rebuild(&players, &scores, &config).unwrap();
    let second_pool = SharedPool::default().rebuild(&players, &scores, &config).unwrap();

    let first = RankedSuggester::new(&first_pool, &config)
        .suggest("p7", &PlayerHistory::default(), now)
        .unwrap();
    let second = RankedSuggester::new(&second_pool, &config)
        .suggest("p7", &PlayerHistory::default(), now)
        .unwrap();

    assert_eq!(first.suggestions, second.suggestions);
}

#[test]
fn test_concurrent_readers_share_one_pool() {
    init_test_env();
    let config = SuggestConfig::default();
    let (players, scores) = generate_db_candidates(30, 60, 30, 12);

    let shared = Arc::new(SharedPool::default());
    shared.rebuild(&players, &scores, &config).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = Arc::clone(&shared);
            let config = config.clone();
            thread::spawn(move || {
                let pool = shared.snapshot();
                let player_id = pool.players[i].id.clone();
                RankedSuggester::new(&pool, &config)
                    .suggest(&player_id, &PlayerHistory::default(), Utc::now())
                    .map(|s| s.suggestions.len())
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
}

#[test]
fn test_similar_run_to_playlist() {
    init_test_env();
    let catalog = generate_catalog(200, 3);
    let references = vec!["m0".to_string(), "m1".to_string(), "m2".to_string()];
    let history = generate_history(&[("m3", None), ("m4", None)]);
    let config = SimilarityConfig {
        match_target: 10,
        ..Default::default()
    };

    let outcome = recommend_similar(&references, &catalog, &history, &config);

    assert!(outcome.matches.len() <= 10);
    assert!(outcome.iterations >= 1 && outcome.iterations <= 8);
    assert!(outcome
        .matches
        .iter()
        .all(|m| !references.contains(&m.leaderboard_id) && m.leaderboard_id != "m3" && m.leaderboard_id != "m4"));

    let playlist = build_playlist("1", &outcome.leaderboard_ids(), &catalog, &config.playlist_author, config.match_target);
    assert_eq!(playlist.songs.len(), outcome.matches.len());
}
