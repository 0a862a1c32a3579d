//! Track domain type
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One playable catalog item
///
/// Equality and hashing are structural over every field. Two catalog results
/// for the same `id` with slightly different metadata (album spelling,
/// thumbnail size) are different tracks as far as dedup is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TrackRecord")]
pub struct Track {
    /// Track title
    pub title: String,

    /// Catalog identifier (video id for the remote catalog)
    pub id: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Track duration in whole seconds (0 when the catalog does not know)
    pub duration_seconds: u64,

    /// Thumbnail URL (may be empty)
    pub thumbnail_url: String,
}

impl Track {
    /// Create a track with the identifying fields; album defaults to "Unknown"
    pub fn new(title: impl Into<String>, id: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            artist: artist.into(),
            album: "Unknown".to_string(),
            duration_seconds: 0,
            thumbnail_url: String::new(),
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the thumbnail URL
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    /// Track duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_seconds)
    }

    /// Key used by the listening duration ledger (`"title - artist"`)
    pub fn duration_key(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// On-disk shapes a track can be read from
///
/// Older library files stored tracks as positional arrays
/// `[title, id, artist, album, duration, thumbnail]`. Those are still
/// accepted on load; tracks are always written back with named fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum TrackRecord {
    Named {
        title: String,
        id: String,
        artist: String,
        #[serde(default)]
        album: String,
        #[serde(default)]
        duration_seconds: u64,
        #[serde(default)]
        thumbnail_url: String,
    },
    Positional(String, String, String, String, u64, String),
}

impl From<TrackRecord> for Track {
    fn from(record: TrackRecord) -> Self {
        match record {
            TrackRecord::Named {
                title,
                id,
                artist,
                album,
                duration_seconds,
                thumbnail_url,
            }
            | TrackRecord::Positional(title, id, artist, album, duration_seconds, thumbnail_url) => {
                Self {
                    title,
                    id,
                    artist,
                    album,
                    duration_seconds,
                    thumbnail_url,
                }
            }
        }
    }
}

/// A track the download pipeline has saved to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DownloadRecord")]
pub struct DownloadedTrack {
    /// Catalog metadata
    pub track: Track,

    /// Where the download collaborator wrote the audio file
    pub local_path: PathBuf,
}

impl DownloadedTrack {
    /// Pair a track with its downloaded file
    pub fn new(track: Track, local_path: impl Into<PathBuf>) -> Self {
        Self {
            track,
            local_path: local_path.into(),
        }
    }
}

/// Legacy downloads were the six track fields followed by the file path
#[derive(Deserialize)]
#[serde(untagged)]
enum DownloadRecord {
    Named { track: Track, local_path: PathBuf },
    Positional(String, String, String, String, u64, String, PathBuf),
}

impl From<DownloadRecord> for DownloadedTrack {
    fn from(record: DownloadRecord) -> Self {
        match record {
            DownloadRecord::Named { track, local_path } => Self { track, local_path },
            DownloadRecord::Positional(title, id, artist, album, duration_seconds, thumbnail_url, local_path) => {
                Self {
                    track: Track {
                        title,
                        id,
                        artist,
                        album,
                        duration_seconds,
                        thumbnail_url,
                    },
                    local_path,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Track {
        Track::new("Hey Jude", "A_MjCqQoLLA", "The Beatles")
            .with_album("Hey Jude")
            .with_duration_seconds(431)
            .with_thumbnail("https://img/1.jpg")
    }

    #[test]
    fn equality_is_structural() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);

        // Same catalog id, different thumbnail: not the same track
        let c = sample().with_thumbnail("https://img/2.jpg");
        assert_ne!(a, c);
    }

    #[test]
    fn duration_key_joins_title_and_artist() {
        assert_eq!(sample().duration_key(), "Hey Jude - The Beatles");
    }

    #[test]
    fn round_trips_with_named_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["title"], "Hey Jude");
        assert_eq!(json["duration_seconds"], 431);

        let back: Track = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn reads_positional_legacy_records() {
        let json = serde_json::json!([
            "Hey Jude",
            "A_MjCqQoLLA",
            "The Beatles",
            "Hey Jude",
            431,
            "https://img/1.jpg"
        ]);

        let track: Track = serde_json::from_value(json).unwrap();
        assert_eq!(track, sample());
    }

    #[test]
    fn reads_legacy_download_tuples() {
        let json = serde_json::json!([
            "Hey Jude",
            "A_MjCqQoLLA",
            "The Beatles",
            "Hey Jude",
            431,
            "https://img/1.jpg",
            "downloads/Hey Jude - The Beatles.mp3"
        ]);

        let download: DownloadedTrack = serde_json::from_value(json).unwrap();
        assert_eq!(download.track, sample());
        assert_eq!(
            download.local_path,
            PathBuf::from("downloads/Hey Jude - The Beatles.mp3")
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = serde_json::json!({"title": "T", "id": "x", "artist": "A"});
        let track: Track = serde_json::from_value(json).unwrap();
        assert_eq!(track.album, "");
        assert_eq!(track.duration_seconds, 0);
    }
}
