//! Playlists document
//!
//! Playlist name -> ordered tracks. Names are validated on creation and
//! tracks appear at most once per playlist.

use beatnest_core::Track;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, StorageError};

/// Longest accepted playlist name, in characters
pub const MAX_NAME_LEN: usize = 50;

/// Validate and normalize a playlist name
///
/// The name is trimmed, must be 1-50 characters long and may only contain
/// ASCII letters, digits, whitespace, `_` and `-`.
pub fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(StorageError::invalid_name(raw, "name is empty"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(StorageError::invalid_name(
            raw,
            format!("longer than {MAX_NAME_LEN} characters"),
        ));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '_' || c == '-';
    if !name.chars().all(allowed) {
        return Err(StorageError::invalid_name(
            raw,
            "only letters, digits, spaces, '_' and '-' are allowed",
        ));
    }

    Ok(name.to_string())
}

/// All playlists, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlists {
    entries: BTreeMap<String, Vec<Track>>,
}

impl Playlists {
    /// Playlist names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Tracks of a playlist
    pub fn get(&self, name: &str) -> Option<&[Track]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Number of playlists
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no playlists
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create an empty playlist, returning the normalized name
    pub fn create(&mut self, raw_name: &str) -> Result<String> {
        let name = validate_name(raw_name)?;
        if self.entries.contains_key(&name) {
            return Err(StorageError::PlaylistExists(name));
        }
        self.entries.insert(name.clone(), Vec::new());
        Ok(name)
    }

    /// Delete a playlist with its tracks
    pub fn delete(&mut self, name: &str) -> Result<Vec<Track>> {
        self.entries
            .remove(name)
            .ok_or_else(|| StorageError::PlaylistNotFound(name.to_string()))
    }

    /// Append a track unless it is already in the playlist
    ///
    /// Returns `true` if the track was added.
    pub fn add_track(&mut self, name: &str, track: Track) -> Result<bool> {
        let tracks = self.tracks_mut(name)?;
        if tracks.contains(&track) {
            return Ok(false);
        }
        tracks.push(track);
        Ok(true)
    }

    /// Remove a track from the playlist
    ///
    /// Returns `true` if the track was present.
    pub fn remove_track(&mut self, name: &str, track: &Track) -> Result<bool> {
        let tracks = self.tracks_mut(name)?;
        let Some(pos) = tracks.iter().position(|t| t == track) else {
            return Ok(false);
        };
        tracks.remove(pos);
        Ok(true)
    }

    /// Sort a playlist by ascending duration (stable)
    pub fn sort_by_duration(&mut self, name: &str) -> Result<()> {
        self.tracks_mut(name)?
            .sort_by_key(|t| t.duration_seconds);
        Ok(())
    }

    fn tracks_mut(&mut self, name: &str) -> Result<&mut Vec<Track>> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| StorageError::PlaylistNotFound(name.to_string()))
    }
}
