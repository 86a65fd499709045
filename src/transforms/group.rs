//! Channel grouping
//!
//! A display organization pass: events sharing a channel become contiguous
//! within their track, ordered by time inside each group. Channel-less
//! events lead the track. Timing is untouched.

use crate::models::Song;

pub fn apply(song: &mut Song) {
    for track in &mut song.tracks {
        track
            .events
            .sort_by_key(|e| (group_key(e.event.channel()), e.time, e.order));
    }
}

fn group_key(channel: Option<u8>) -> u8 {
    match channel {
        None => 0,
        Some(c) => c + 1,
    }
}
