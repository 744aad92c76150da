use crate::model::structures::playlist::Playlist;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write playlist: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to serialize playlist: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Playlist has no title")]
    EmptyTitle
}

/// Writes playlists as pretty-printed JSON files into a directory
#[derive(Debug, Clone)]
pub struct JsonFileExporter {
    output_dir: PathBuf
}

impl JsonFileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into()
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `recommendation_{player}_{yyyyMMdd_HHmmss}.json`
    pub fn file_name(player_id: &str, at: DateTime<Utc>) -> String {
        format!("recommendation_{}_{}.json", player_id, at.format("%Y%m%d_%H%M%S"))
    }

    /// Writes the playlist, creating the output directory if needed, and
    /// returns the path of the written file
    pub async fn export(&self, playlist: &Playlist, player_id: &str, at: DateTime<Utc>) -> Result<PathBuf, ExportError> {
        if playlist.playlist_title.trim().is_empty() {
            return Err(ExportError::EmptyTitle);
        }

        let body = serde_json::to_string_pretty(playlist)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(Self::file_name(player_id, at));
        tokio::fs::write(&path, body).await?;

        info!("Playlist with {} songs written to {}", playlist.songs.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportError, JsonFileExporter};
    use crate::{
        model::{playlist::build_playlist, structures::playlist::Playlist},
        utils::test_utils::generate_leaderboard
    };
    use chrono::{TimeZone, Utc};

    fn playlist() -> Playlist {
        let catalog = vec![generate_leaderboard("a", 5.0, 5.0, 5.0)];
        build_playlist("42", &["a".to_string()], &catalog, "BeatLeader", 50)
    }

    #[test]
    fn test_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();

        assert_eq!(JsonFileExporter::file_name("42", at), "recommendation_42_20240307_090501.json");
    }

    #[tokio::test]
    async fn test_export_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JsonFileExporter::new(dir.path().join("Recommendations"));
        let playlist = playlist();

        let path = exporter.export(&playlist, "42", Utc::now()).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Playlist = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, playlist);
        assert!(written.contains("\n  \"playlistTitle\""));
    }

    #[tokio::test]
    async fn test_export_rejects_empty_title() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JsonFileExporter::new(dir.path());
        let mut playlist = playlist();
        playlist.playlist_title = String::new();

        let result = exporter.export(&playlist, "42", Utc::now()).await;

        assert!(matches!(result, Err(ExportError::EmptyTitle)));
    }

    #[tokio::test]
    async fn test_export_surfaces_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the output directory should be
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "x").unwrap();
        let exporter = JsonFileExporter::new(&blocked);

        let result = exporter.export(&playlist(), "42", Utc::now()).await;

        assert!(matches!(result, Err(ExportError::IoError(_))));
    }
}
