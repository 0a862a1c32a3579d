//! Next / previous decision policy
//!
//! Pure functions over the queue, shuffle order and modes. The session decides
//! what to do with the answer (play it, or stop on `NoNext`).

use crate::error::NavigationError;
use crate::queue::Queue;
use crate::shuffle::ShuffleOrder;
use crate::types::RepeatMode;
use beatnest_core::Track;

/// Where the next track came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTrack {
    /// Popped from the explicit queue
    Queued(Track),

    /// Current track again (repeat one)
    Repeat(Track),

    /// Drawn from the context at `index`
    Context { index: usize, track: Track },
}

impl NextTrack {
    /// The chosen track
    pub fn track(&self) -> &Track {
        match self {
            Self::Queued(track) | Self::Repeat(track) | Self::Context { track, .. } => track,
        }
    }

    /// Take the chosen track
    pub fn into_track(self) -> Track {
        match self {
            Self::Queued(track) | Self::Repeat(track) | Self::Context { track, .. } => track,
        }
    }
}

/// Modes that influence navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationModes {
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

/// Pick the next track
///
/// Resolution order, first applicable wins:
/// 1. explicit queue front
/// 2. repeat-one replays the current track
/// 3. shuffle over a bounded context draws from the shuffle order
/// 4. the following context item (repeat-all wraps to the first)
///
/// `position` is the context index of the current track. A current track
/// without one (queued or ad hoc) gives `NoNext` for 3 and 4.
pub fn next(
    queue: &mut Queue,
    order: &mut ShuffleOrder,
    modes: NavigationModes,
    current: Option<&Track>,
    position: Option<usize>,
) -> Result<NextTrack, NavigationError> {
    if let Some(track) = queue.pop_front() {
        return Ok(NextTrack::Queued(track));
    }

    if modes.repeat == RepeatMode::One {
        if let Some(track) = current {
            return Ok(NextTrack::Repeat(track.clone()));
        }
    }

    if !queue.context().is_bounded() || queue.context_len() == 0 {
        return Err(NavigationError::NoNext);
    }

    let current_index = match (current, position) {
        (None, _) => None,
        (Some(_), Some(index)) if index < queue.context_len() => Some(index),
        (Some(_), _) => return Err(NavigationError::NoNext),
    };

    if modes.shuffle {
        if let Some(index) = order.next_index(queue.context_len(), current_index) {
            return context_item(queue, index);
        }
    }

    let Some(index) = current_index else {
        return Err(NavigationError::NoNext);
    };

    if index + 1 < queue.context_len() {
        context_item(queue, index + 1)
    } else if modes.repeat == RepeatMode::All {
        context_item(queue, 0)
    } else {
        Err(NavigationError::NoNext)
    }
}

/// Pick the previous track: the item before `position`, bounded contexts only
pub fn previous(queue: &Queue, position: Option<usize>) -> Result<NextTrack, NavigationError> {
    if !queue.context().is_bounded() {
        return Err(NavigationError::NoPrevious);
    }

    let index = position
        .filter(|&index| index < queue.context_len())
        .ok_or(NavigationError::NoPrevious)?;

    if index == 0 {
        return Err(NavigationError::NoPrevious);
    }

    context_item(queue, index - 1).map_err(|_| NavigationError::NoPrevious)
}

fn context_item(queue: &Queue, index: usize) -> Result<NextTrack, NavigationError> {
    queue
        .context_track(index)
        .map(|track| NextTrack::Context {
            index,
            track: track.clone(),
        })
        .ok_or(NavigationError::NoNext)
}
