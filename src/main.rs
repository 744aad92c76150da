use chrono::Utc;
use clap::Parser;
use map_recommender::{
    args::{Args, Command, RankedArgs, SimilarArgs},
    database::db::{DbClient, DbError},
    export::json::{ExportError, JsonFileExporter},
    model::{
        playlist::build_playlist,
        shared_pool::{PoolError, SharedPool},
        similarity::recommend_similar,
        structures::history::PlayerHistory,
        suggest::{RankedSuggester, SuggestError}
    }
};
use std::{path::PathBuf, process};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Suggest(#[from] SuggestError),

    #[error(transparent)]
    Export(#[from] ExportError)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log_level);

    let client = match DbClient::connect(&args.connection_string).await {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            error!("Application cannot start without a valid database connection");
            process::exit(1);
        }
    };

    let exporter = JsonFileExporter::new(&args.output_dir);
    let result = match &args.command {
        Command::Ranked(ranked) => run_ranked(&client, &exporter, ranked, &args).await,
        Command::Similar(similar) => run_similar(&client, &exporter, similar).await
    };

    match result {
        Ok(Some(path)) => info!("Recommendations saved to {}", path.display()),
        Ok(None) => warn!("No recommendation possible"),
        Err(e) => {
            error!("Recommendation failed: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(level: &str) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

async fn run_ranked(
    client: &DbClient,
    exporter: &JsonFileExporter,
    ranked: &RankedArgs,
    args: &Args
) -> Result<Option<PathBuf>, RunError> {
    let config = ranked.config();

    let players = client.get_players().await?;
    let top_scores = client.get_top_scores(config.candidate_window).await?;

    let shared = SharedPool::default();
    let pool = shared.rebuild(&players, &top_scores, &config)?;

    let history = PlayerHistory::new(&client.get_played(&ranked.player_id).await?);

    let mut suggester = RankedSuggester::new(&pool, &config);
    if let Some(limit) = args.budget() {
        suggester = suggester.with_budget(limit);
    }
    let suggestion = suggester.suggest(&ranked.player_id, &history, Utc::now())?;

    if suggestion.is_empty() {
        return Ok(None);
    }

    let catalog = client.get_leaderboards().await?;
    let playlist = build_playlist(
        &ranked.player_id,
        &suggestion.suggestions,
        &catalog,
        &config.playlist_author,
        config.suggestion_count
    );

    Ok(Some(exporter.export(&playlist, &ranked.player_id, Utc::now()).await?))
}

async fn run_similar(
    client: &DbClient,
    exporter: &JsonFileExporter,
    similar: &SimilarArgs
) -> Result<Option<PathBuf>, RunError> {
    let config = similar.config();

    let catalog = client.get_leaderboards().await?;
    let history = PlayerHistory::new(&client.get_played(&similar.player_id).await?);

    let outcome = recommend_similar(&similar.references, &catalog, &history, &config);
    if outcome.matches.is_empty() {
        return Ok(None);
    }

    let playlist = build_playlist(
        &similar.player_id,
        &outcome.leaderboard_ids(),
        &catalog,
        &config.playlist_author,
        config.match_target
    );

    Ok(Some(exporter.export(&playlist, &similar.player_id, Utc::now()).await?))
}
