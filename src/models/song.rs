//! Song, track and timed-event containers
//!
//! A `Song` holds ordered tracks of events with absolute tick times plus an
//! arrival index used as the final tie-break, so canonicalization is
//! deterministic regardless of input order.

use serde::{Deserialize, Serialize};

use super::events::Event;

/// Default resolution when none is available (SMPTE-timed input)
pub const DEFAULT_PPQ: u16 = 480;

/// An event placed at an absolute time within a track
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimedEvent {
    /// Absolute time in ticks from the start of the song
    pub time: u64,

    /// Arrival index within the track, fixed at construction
    pub order: u32,

    pub event: Event,
}

/// One stream of timed events
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Track {
    pub events: Vec<TimedEvent>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, assigning the next arrival index
    pub fn push(&mut self, time: u64, event: Event) {
        let order = self.events.len() as u32;
        self.events.push(TimedEvent { time, order, event });
    }

    /// Sort events by (time, class rank, arrival index)
    pub fn canonicalize(&mut self) {
        self.events
            .sort_by_key(|e| (e.time, e.event.class_rank(), e.order));
    }
}

/// A multi-track sequence with a global tick resolution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Song {
    /// Ticks per quarter note, always positive
    pub ppq: u16,

    pub tracks: Vec<Track>,
}

impl Song {
    /// Create an empty song with one empty track
    pub fn new(ppq: u16) -> Self {
        Self {
            ppq,
            tracks: vec![Track::new()],
        }
    }

    /// Total number of events across all tracks
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(|t| t.events.len()).sum()
    }

    /// Canonicalize every track
    ///
    /// Idempotent: the sort key is total over (time, class, order), so a
    /// second pass observes an already-sorted sequence.
    pub fn canonicalize(&mut self) {
        for track in &mut self.tracks {
            track.canonicalize();
        }
    }
}
