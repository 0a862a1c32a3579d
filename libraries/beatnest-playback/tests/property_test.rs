//! Property-based tests for the playback session
//!
//! Uses proptest to verify invariants across many random inputs.

use beatnest_core::{AudioSource, ResolutionError, Track};
use beatnest_playback::level::tier_for;
use beatnest_playback::{
    NavigationError, PlaybackConfig, PlaybackContext, PlaybackSession, ResolveTicket,
    SimulatedBackend, UserLevel,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

// ===== Helpers =====

fn create_test_track(n: usize) -> Track {
    Track::new(format!("Track {n}"), format!("id{n}"), "Artist").with_duration_seconds(120)
}

fn new_session() -> PlaybackSession {
    let (backend, _) = SimulatedBackend::new();
    PlaybackSession::new(PlaybackConfig::default(), Box::new(backend))
}

fn local(track: &Track) -> AudioSource {
    AudioSource::LocalFile(PathBuf::from(format!("{}.mp3", track.id)))
}

#[derive(Debug, Clone)]
enum Op {
    Play(usize),
    PlayFromContext(usize),
    Enqueue(usize),
    Next,
    Previous,
    Stop,
    ResolveLatest(bool),
    ResolveStale,
    SetShuffle(bool),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..12).prop_map(Op::Play),
        (0usize..8).prop_map(Op::PlayFromContext),
        (0usize..12).prop_map(Op::Enqueue),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Stop),
        any::<bool>().prop_map(Op::ResolveLatest),
        Just(Op::ResolveStale),
        any::<bool>().prop_map(Op::SetShuffle),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: the current track is always the track of the newest request,
    /// or nothing after a stop
    #[test]
    fn current_track_follows_latest_request(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let mut session = new_session();
        let context: Vec<Track> = (0..8).map(create_test_track).collect();
        let mut tickets: Vec<ResolveTicket> = Vec::new();
        let mut expected: Option<Track> = None;

        for op in ops {
            match op {
                Op::Play(n) => {
                    let ticket = session.play(create_test_track(n));
                    expected = Some(ticket.track.clone());
                    tickets.push(ticket);
                }
                Op::PlayFromContext(i) => {
                    let ticket = session
                        .play_from_context(
                            PlaybackContext::Playlist { name: "Mix".to_string() },
                            context.clone(),
                            i,
                        )
                        .unwrap();
                    expected = Some(ticket.track.clone());
                    tickets.push(ticket);
                }
                Op::Enqueue(n) => {
                    session.enqueue(create_test_track(n));
                }
                Op::Next => match session.next() {
                    Ok(ticket) => {
                        expected = Some(ticket.track.clone());
                        tickets.push(ticket);
                    }
                    Err(NavigationError::NoNext) => expected = None,
                    Err(NavigationError::NoPrevious) => unreachable!(),
                },
                Op::Previous => {
                    if let Ok(ticket) = session.previous() {
                        expected = Some(ticket.track.clone());
                        tickets.push(ticket);
                    }
                }
                Op::Stop => {
                    session.stop();
                    expected = None;
                }
                Op::ResolveLatest(ok) => {
                    if let Some(ticket) = tickets.last() {
                        let result = if ok {
                            Ok(local(&ticket.track))
                        } else {
                            Err(ResolutionError::network("offline"))
                        };
                        session.complete_resolution(ticket.generation, result);
                    }
                }
                Op::ResolveStale => {
                    if tickets.len() >= 2 {
                        let stale = &tickets[tickets.len() - 2];
                        prop_assert!(!session.complete_resolution(stale.generation, Ok(local(&stale.track))));
                    }
                }
                Op::SetShuffle(on) => session.set_shuffle(on),
            }

            prop_assert_eq!(session.current_track(), expected.as_ref());
        }
    }

    /// Property: N-1 shuffled skips visit every other context track exactly once
    #[test]
    fn shuffle_covers_context_without_repeats(len in 2usize..30, start in 0usize..30) {
        let start = start % len;
        let tracks: Vec<Track> = (0..len).map(create_test_track).collect();

        let mut session = new_session();
        session.set_shuffle(true);
        session
            .play_from_context(PlaybackContext::SearchResults, tracks.clone(), start)
            .unwrap();

        let mut seen = HashSet::new();
        for _ in 0..len - 1 {
            let ticket = session.next().unwrap();
            prop_assert!(seen.insert(ticket.track.id.clone()));
        }

        prop_assert!(!seen.contains(&tracks[start].id));
        prop_assert_eq!(seen.len(), len - 1);
    }

    /// Property: the level never regresses and each crossed tier is reported once
    #[test]
    fn level_is_monotonic(increments in prop::collection::vec(0.0f64..20_000.0, 1..40)) {
        let mut level = UserLevel::default();
        let mut total = 0.0;
        let mut reported = Vec::new();

        for increment in increments {
            let before = tier_for(total);
            total += increment;
            reported.extend(level.advance(total));
            prop_assert!(tier_for(total) >= before);
            prop_assert_eq!(level.name(), beatnest_playback::level_for(total));
        }

        let unique: HashSet<_> = reported.iter().collect();
        prop_assert_eq!(unique.len(), reported.len());
        prop_assert_eq!(reported.len(), tier_for(total));
    }

    /// Property: K ticks of a fixed interval while playing add exactly K intervals
    #[test]
    fn ticks_accumulate_exactly(ticks in 1u32..40, interval_ms in 1u64..2_000) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let total = runtime.block_on(async {
            let mut session = new_session();
            let ticket = session.play(create_test_track(0));
            session.complete_resolution(ticket.generation, Ok(local(&ticket.track)));

            for _ in 0..ticks {
                tokio::time::advance(Duration::from_millis(interval_ms)).await;
                session.tick();
            }
            session.ledger().total_seconds()
        });

        let expected = f64::from(ticks) * interval_ms as f64 / 1000.0;
        prop_assert!((total - expected).abs() < 1e-6, "total {} expected {}", total, expected);
    }
}
