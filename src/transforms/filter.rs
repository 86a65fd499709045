//! Channel filtering
//!
//! Channel-less events (meta, directives) always survive; only events that
//! address a channel are considered.

use crate::models::Song;

/// Keep only events on the listed channels; returns the number dropped
pub fn include(song: &mut Song, channels: &[u8]) -> usize {
    retain(song, |channel| channels.contains(&channel))
}

/// Drop events on the listed channels; returns the number dropped
pub fn exclude(song: &mut Song, channels: &[u8]) -> usize {
    retain(song, |channel| !channels.contains(&channel))
}

fn retain(song: &mut Song, keep: impl Fn(u8) -> bool) -> usize {
    let mut dropped = 0;
    for track in &mut song.tracks {
        let before = track.events.len();
        track
            .events
            .retain(|e| e.event.channel().map_or(true, &keep));
        dropped += before - track.events.len();
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::meta_kind;
    use crate::models::Event;

    fn multi_channel_song() -> Song {
        let mut song = Song::new(480);
        let track = &mut song.tracks[0];
        for channel in [1u8, 2, 3, 4] {
            track.push(
                0,
                Event::NoteOn {
                    channel,
                    key: 60,
                    velocity: 100,
                },
            );
        }
        track.push(
            0,
            Event::Meta {
                kind: meta_kind::TEMPO,
                data: vec![0x07, 0xA1, 0x20],
            },
        );
        song
    }

    fn channels(song: &Song) -> Vec<Option<u8>> {
        song.tracks[0]
            .events
            .iter()
            .map(|e| e.event.channel())
            .collect()
    }

    #[test]
    fn test_include_keeps_listed_channels_and_meta() {
        let mut song = multi_channel_song();
        let dropped = include(&mut song, &[1, 2]);
        assert_eq!(dropped, 2);
        assert_eq!(channels(&song), vec![Some(1), Some(2), None]);
    }

    #[test]
    fn test_exclude_drops_listed_channels() {
        let mut song = multi_channel_song();
        let dropped = exclude(&mut song, &[3]);
        assert_eq!(dropped, 1);
        assert_eq!(channels(&song), vec![Some(1), Some(2), Some(4), None]);
    }
}
