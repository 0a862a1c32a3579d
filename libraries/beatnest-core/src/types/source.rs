//! Playable audio locations
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Where the bytes for a track come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum AudioSource {
    /// Previously downloaded file on local disk
    LocalFile(PathBuf),

    /// Remote stream located by the media fetcher
    Stream(Url),
}

impl AudioSource {
    /// Check if the source is on local disk
    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocalFile(_))
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile(path) => write!(f, "file:{}", path.display()),
            Self::Stream(url) => write!(f, "{url}"),
        }
    }
}
