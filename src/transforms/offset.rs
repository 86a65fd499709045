//! Whole-song time offset in beats

use crate::models::Song;

use super::TransformReport;

/// Shift every event by `beats * ppq` ticks, clamping at zero
pub fn apply(song: &mut Song, beats: f32, report: &mut TransformReport) {
    let shift = (beats as f64 * song.ppq as f64).round() as i64;

    for track in &mut song.tracks {
        for event in &mut track.events {
            let shifted = event.time as i64 + shift;
            if shifted < 0 {
                event.time = 0;
                report.times_clamped += 1;
            } else {
                event.time = shifted as u64;
            }
        }
    }
}
