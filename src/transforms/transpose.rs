//! Semitone transposition of note events

use crate::models::{Event, Song};

use super::TransformReport;

/// Add `semitones` to every note key, clamping into the MIDI range
pub fn apply(song: &mut Song, semitones: i32, report: &mut TransformReport) {
    for track in &mut song.tracks {
        for timed in &mut track.events {
            if let Event::NoteOn { key, .. } | Event::NoteOff { key, .. } = &mut timed.event {
                let shifted = *key as i32 + semitones;
                let clamped = shifted.clamp(0, 127);
                if clamped != shifted {
                    report.keys_clamped += 1;
                }
                *key = clamped as u8;
            }
        }
    }
}
