use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    database::db_structs::Leaderboard,
    model::{
        constants::LEVEL_ID_PREFIX,
        structures::playlist::{Difficulty, Playlist, PlaylistCustomData, Song}
    }
};

pub fn playlist_title(player_id: &str) -> String {
    format!("Recommendations for {}", player_id)
}

/// Lowercases only the first character, e.g. "ExpertPlus" -> "expertPlus"
fn difficulty_key(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new()
    }
}

pub fn song_from_leaderboard(leaderboard: &Leaderboard) -> Song {
    Song {
        song_name: leaderboard.name.clone(),
        level_author_name: leaderboard.mapper.clone(),
        hash: leaderboard.hash.clone(),
        levelid: format!("{}{}", LEVEL_ID_PREFIX, leaderboard.hash),
        difficulties: vec![Difficulty {
            characteristic: leaderboard.mode_name.clone(),
            name: difficulty_key(&leaderboard.difficulty_name)
        }]
    }
}

/// Builds the playlist document for the first `limit` suggested leaderboards,
/// in suggestion order. Ids missing from the catalog are skipped.
pub fn build_playlist(
    player_id: &str,
    leaderboard_ids: &[String],
    catalog: &[Leaderboard],
    author: &str,
    limit: usize
) -> Playlist {
    let by_id: HashMap<&str, &Leaderboard> = catalog.iter().map(|l| (l.id.as_str(), l)).collect();

    let mut missing = 0usize;
    let songs: Vec<Song> = leaderboard_ids
        .iter()
        .take(limit)
        .filter_map(|id| {
            let leaderboard = by_id.get(id.as_str());
            if leaderboard.is_none() {
                missing += 1;
            }
            leaderboard.map(|l| song_from_leaderboard(l))
        })
        .collect();

    if missing > 0 {
        warn!("{} suggested leaderboards were not found in the catalog", missing);
    }
    debug!("Playlist for {} holds {} songs", player_id, songs.len());

    Playlist {
        playlist_title: playlist_title(player_id),
        playlist_author: author.to_string(),
        custom_data: PlaylistCustomData {
            sync_url: String::new(),
            owner: player_id.to_string(),
            id: String::new(),
            hash: String::new(),
            shared: false
        },
        songs,
        image: String::new()
    }
}
