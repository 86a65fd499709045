//! Note merging
//!
//! A release immediately followed by a re-attack of the same channel and
//! key reads as one sustained note; dropping both events fuses the
//! surrounding pair. The lookahead window is `tolerance` ticks (zero-gap by
//! default).

use crate::models::{Event, Song};

/// Default gap tolerance in ticks
pub const MERGE_TOLERANCE_TICKS: u64 = 0;

/// Fuse back-to-back notes of the same channel and key
pub fn apply(song: &mut Song, tolerance: u64) {
    for track in &mut song.tracks {
        // Releases sort before attacks at the same tick, so a linear scan
        // over canonical order sees each release before its re-attack.
        track.canonicalize();

        let events = &mut track.events;
        let mut i = 0;
        while i < events.len() {
            let Some((channel, key)) = release_identity(&events[i].event) else {
                i += 1;
                continue;
            };
            let release_time = events[i].time;

            let mut matched = false;
            let mut j = i + 1;
            while j < events.len() && events[j].time <= release_time + tolerance {
                if let Event::NoteOn {
                    channel: c,
                    key: k,
                    velocity,
                } = &events[j].event
                {
                    if *c == channel && *k == key && *velocity > 0 {
                        events.remove(j);
                        events.remove(i);
                        matched = true;
                        break;
                    }
                }
                j += 1;
            }

            if !matched {
                i += 1;
            }
        }
    }
}

fn release_identity(event: &Event) -> Option<(u8, u8)> {
    match event {
        Event::NoteOff { channel, key, .. } => Some((*channel, *key)),
        Event::NoteOn {
            channel,
            key,
            velocity: 0,
        } => Some((*channel, *key)),
        _ => None,
    }
}
