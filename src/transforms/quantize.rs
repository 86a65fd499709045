//! Grid quantization, swing, and humanize
//!
//! All three operate on the same subdivision: `ppq / grid` ticks, or one
//! beat when no grid is set. Times never go negative; clamps are counted in
//! the report.

use crate::models::Song;

use super::TransformReport;

/// Snap, swing, and jitter event times in place
pub fn apply(song: &mut Song, grid: u32, swing: f32, humanize: f32, report: &mut TransformReport) {
    let step = if grid > 0 {
        song.ppq as f64 / grid as f64
    } else {
        song.ppq as f64
    };

    let mut rng = XorShift64::seeded();

    for track in &mut song.tracks {
        for event in &mut track.events {
            let mut time = event.time as f64;

            if grid > 0 {
                time = (time / step).round() * step;
            }
            if swing > 0.0 {
                let subdivision = (time / step).round() as i64;
                if subdivision % 2 != 0 {
                    time += swing as f64 * step;
                }
            }
            if humanize > 0.0 {
                let jitter = (rng.next_f64() * 2.0 - 1.0) * humanize as f64 * step;
                time += jitter;
            }

            if time < 0.0 {
                time = 0.0;
                report.times_clamped += 1;
            }
            event.time = time.round() as u64;
        }
    }
}

/// Small xorshift generator for jitter; seeded from the platform entropy
/// source, with a fixed fallback seed when none is available
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn seeded() -> Self {
        let mut buf = [0u8; 8];
        let _ = getrandom::getrandom(&mut buf);
        Self {
            state: u64::from_le_bytes(buf) | 1,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
