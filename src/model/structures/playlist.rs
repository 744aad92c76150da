use serde::{Deserialize, Serialize};

/// Playlist document in the format game clients import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub playlist_title: String,
    pub playlist_author: String,
    pub custom_data: PlaylistCustomData,
    pub songs: Vec<Song>,
    pub image: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistCustomData {
    #[serde(rename = "syncURL")]
    pub sync_url: String,
    pub owner: String,
    pub id: String,
    pub hash: String,
    pub shared: bool
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub song_name: String,
    pub level_author_name: String,
    pub hash: String,
    pub levelid: String,
    pub difficulties: Vec<Difficulty>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub characteristic: String,
    pub name: String
}
