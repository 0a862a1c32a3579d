//! Recommendation heuristic
//!
//! Seeds a short "recommended for you" list from listening history, the most
//! recent search and a fallback query. Every catalog failure is treated as
//! "no results": recommendations are best effort.

use crate::types::PlaybackConfig;
use beatnest_core::{CatalogError, CatalogProvider, SearchFilter, Track};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Number of top history tracks used as seeds
const SEED_TRACKS: usize = 3;

/// Related tracks taken per seed
const PER_SEED: usize = 2;

/// Results taken from the most recent search
const FROM_RECENT_SEARCH: usize = 3;

/// Most played tracks, most frequent first
///
/// Ties keep the order in which the tracks first appear in `history`.
pub fn top_tracks(history: &[Track], n: usize) -> Vec<Track> {
    let mut counts: HashMap<&Track, usize> = HashMap::new();
    let mut first_seen: Vec<&Track> = Vec::new();

    for track in history {
        let count = counts.entry(track).or_insert(0);
        if *count == 0 {
            first_seen.push(track);
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order within equal counts
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen.into_iter().take(n).cloned().collect()
}

/// Current recommendations and how often each was played
///
/// Play counts are keyed by track title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCache {
    #[serde(default)]
    tracks: Vec<Track>,

    #[serde(default)]
    play_counts: BTreeMap<String, u64>,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list; play counts restart at zero
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.play_counts = tracks.iter().map(|t| (t.title.clone(), 0)).collect();
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.contains(track)
    }

    /// Count a play if the track is recommended; returns whether it counted
    pub fn record_play(&mut self, track: &Track) -> bool {
        if !self.contains(track) {
            return false;
        }
        *self.play_counts.entry(track.title.clone()).or_insert(0) += 1;
        true
    }

    pub fn play_count(&self, title: &str) -> u64 {
        self.play_counts.get(title).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Accumulates picks with dedup against history and earlier picks
struct Picks<'a> {
    history: &'a [Track],
    picked: Vec<Track>,
    limit: usize,
}

impl<'a> Picks<'a> {
    fn new(history: &'a [Track], limit: usize) -> Self {
        Self {
            history,
            picked: Vec::new(),
            limit,
        }
    }

    fn is_full(&self) -> bool {
        self.picked.len() >= self.limit
    }

    fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.picked.len())
    }

    fn offer(&mut self, candidates: impl IntoIterator<Item = Track>) {
        for track in candidates {
            if self.is_full() {
                break;
            }
            if track.id.is_empty() || self.history.contains(&track) || self.picked.contains(&track) {
                continue;
            }
            self.picked.push(track);
        }
    }
}

/// Builds recommendation lists from a catalog provider
#[derive(Clone)]
pub struct RecommendationSeeder {
    catalog: Arc<dyn CatalogProvider>,
    timeout: Duration,
    limit: usize,
    fallback_query: String,
}

impl RecommendationSeeder {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        timeout: Duration,
        limit: usize,
        fallback_query: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            timeout,
            limit,
            fallback_query: fallback_query.into(),
        }
    }

    /// Seeder using the catalog timeout, limit and fallback query from `config`
    pub fn from_config(catalog: Arc<dyn CatalogProvider>, config: &PlaybackConfig) -> Self {
        Self::new(
            catalog,
            config.catalog_timeout(),
            config.recommendation_limit,
            config.fallback_query.clone(),
        )
    }

    /// Build a fresh recommendation list
    ///
    /// 1. related tracks of the top history tracks (artist search when the
    ///    catalog has nothing related)
    /// 2. the most recent search, while short
    /// 3. the fallback query, while short
    pub async fn seed(&self, history: &[Track], latest_search: Option<&str>) -> Vec<Track> {
        let mut picks = Picks::new(history, self.limit);

        for seed in top_tracks(history, SEED_TRACKS) {
            if picks.is_full() {
                break;
            }

            let related = self
                .bounded("related tracks", self.catalog.related_tracks(&seed.id))
                .await;
            if related.is_empty() {
                let by_artist = self
                    .bounded(
                        "artist search",
                        self.catalog.search(&seed.artist, SearchFilter::Songs, PER_SEED),
                    )
                    .await;
                picks.offer(by_artist.into_iter().take(PER_SEED));
            } else {
                picks.offer(related.into_iter().take(PER_SEED));
            }
        }

        if let Some(query) = latest_search.filter(|q| !q.trim().is_empty()) {
            if !picks.is_full() {
                let results = self
                    .bounded(
                        "recent search",
                        self.catalog.search(query, SearchFilter::Songs, FROM_RECENT_SEARCH),
                    )
                    .await;
                picks.offer(results);
            }
        }

        if !picks.is_full() && !self.fallback_query.is_empty() {
            let results = self
                .bounded(
                    "fallback search",
                    self.catalog
                        .search(&self.fallback_query, SearchFilter::Songs, picks.remaining()),
                )
                .await;
            picks.offer(results);
        }

        debug!(count = picks.picked.len(), "Seeded recommendations");
        picks.picked
    }

    async fn bounded<F>(&self, what: &str, request: F) -> Vec<Track>
    where
        F: Future<Output = Result<Vec<Track>, CatalogError>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(tracks)) => tracks,
            Ok(Err(e)) => {
                warn!(request = what, error = %e, "Catalog request failed");
                Vec::new()
            }
            Err(_) => {
                warn!(request = what, error = %CatalogError::Timeout, "Catalog request failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn track(id: &str, artist: &str) -> Track {
        Track::new(format!("Song {id}"), id, artist)
    }

    /// Catalog with canned answers that records every query
    #[derive(Default)]
    struct FakeCatalog {
        related: HashMap<String, Vec<Track>>,
        searches: HashMap<String, Vec<Track>>,
        fail_related: bool,
        slow: bool,
        queries: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl CatalogProvider for FakeCatalog {
        async fn search(
            &self,
            query: &str,
            _filter: SearchFilter,
            limit: usize,
        ) -> Result<Vec<Track>, CatalogError> {
            self.queries.lock().unwrap().push((query.to_string(), limit));
            if self.slow {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            let results = self.searches.get(query).cloned().unwrap_or_default();
            Ok(results.into_iter().take(limit).collect())
        }

        async fn related_tracks(&self, track_id: &str) -> Result<Vec<Track>, CatalogError> {
            if self.fail_related {
                return Err(CatalogError::Unavailable("offline".to_string()));
            }
            Ok(self.related.get(track_id).cloned().unwrap_or_default())
        }
    }

    fn seeder(catalog: FakeCatalog) -> (RecommendationSeeder, Arc<FakeCatalog>) {
        let catalog = Arc::new(catalog);
        let seeder = RecommendationSeeder::new(catalog.clone(), Duration::from_secs(5), 5, "The Beatles");
        (seeder, catalog)
    }

    #[test]
    fn top_tracks_by_frequency_then_first_seen() {
        let a = track("a", "X");
        let b = track("b", "X");
        let c = track("c", "X");
        let history = vec![a.clone(), b.clone(), c.clone(), c.clone(), b.clone()];

        assert_eq!(top_tracks(&history, 2), vec![b, c]);
        assert_eq!(top_tracks(&[], 3), Vec::<Track>::new());
    }

    #[test]
    fn cache_counts_only_recommended_tracks() {
        let mut cache = RecommendationCache::new();
        cache.replace(vec![track("a", "X")]);

        assert!(cache.record_play(&track("a", "X")));
        assert!(!cache.record_play(&track("z", "X")));
        assert_eq!(cache.play_count("Song a"), 1);

        cache.replace(vec![track("a", "X")]);
        assert_eq!(cache.play_count("Song a"), 0);
    }

    #[tokio::test]
    async fn takes_two_related_per_seed_and_skips_history() {
        let played = track("p", "Queen");
        let mut catalog = FakeCatalog::default();
        catalog.related.insert(
            "p".to_string(),
            vec![played.clone(), track("r1", "Queen"), track("r2", "Queen"), track("r3", "Queen")],
        );
        catalog
            .searches
            .insert("The Beatles".to_string(), vec![track("f1", "The Beatles"); 1]);

        let (seeder, _) = seeder(catalog);
        let picks = seeder.seed(&[played], None).await;

        // First two related are [played, r1]; played is already in history
        assert_eq!(picks, vec![track("r1", "Queen"), track("f1", "The Beatles")]);
    }

    #[tokio::test]
    async fn falls_back_to_artist_search_when_related_fails() {
        let played = track("p", "Queen");
        let mut catalog = FakeCatalog {
            fail_related: true,
            ..Default::default()
        };
        catalog
            .searches
            .insert("Queen".to_string(), vec![track("q1", "Queen"), track("q2", "Queen")]);

        let (seeder, catalog) = seeder(catalog);
        let picks = seeder.seed(&[played], None).await;

        assert_eq!(picks[..2], [track("q1", "Queen"), track("q2", "Queen")]);
        assert_eq!(catalog.queries.lock().unwrap()[0], ("Queen".to_string(), 2));
    }

    #[tokio::test]
    async fn empty_history_uses_recent_search_then_fallback() {
        let mut catalog = FakeCatalog::default();
        catalog.searches.insert(
            "jazz".to_string(),
            vec![track("j1", "Miles"), track("j2", "Miles"), track("j3", "Miles")],
        );
        catalog.searches.insert(
            "The Beatles".to_string(),
            vec![track("b1", "The Beatles"), track("b2", "The Beatles"), track("b3", "The Beatles")],
        );

        let (seeder, catalog) = seeder(catalog);
        let picks = seeder.seed(&[], Some("jazz")).await;

        assert_eq!(picks.len(), 5);
        assert_eq!(picks[3], track("b1", "The Beatles"));
        assert_eq!(
            *catalog.queries.lock().unwrap(),
            vec![("jazz".to_string(), 3), ("The Beatles".to_string(), 2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_catalog_yields_nothing() {
        let (seeder, _) = seeder(FakeCatalog {
            slow: true,
            ..Default::default()
        });

        assert!(seeder.seed(&[], Some("jazz")).await.is_empty());
    }
}
