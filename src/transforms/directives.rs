//! Directive materialization and extraction
//!
//! Two independent pattern-matching passes over the known directive
//! catalogue (tempo, timesig, marker). Materialization turns a directive
//! into its literal meta event in place; extraction is the inverse match.
//! Unknown directives and unparseable arguments are left alone.

use crate::models::events::meta_kind;
use crate::models::{Directive, Event, Song};

/// Replace known directives with the meta events they describe
pub fn materialize(song: &mut Song) {
    for track in &mut song.tracks {
        for timed in &mut track.events {
            let Event::Directive(directive) = &timed.event else {
                continue;
            };
            if let Some(event) = materialize_one(directive) {
                timed.event = event;
            }
        }
    }
}

fn materialize_one(directive: &Directive) -> Option<Event> {
    match directive.name.as_str() {
        "tempo" => {
            let bpm: f64 = directive.args.first()?.parse().ok()?;
            if !(bpm > 0.0) {
                return None;
            }
            let micros = (60_000_000.0 / bpm).round() as u32;
            Some(Event::Meta {
                kind: meta_kind::TEMPO,
                data: vec![
                    ((micros >> 16) & 0xFF) as u8,
                    ((micros >> 8) & 0xFF) as u8,
                    (micros & 0xFF) as u8,
                ],
            })
        }
        "timesig" => {
            let (num_str, den_str) = directive.args.first()?.split_once('/')?;
            let numerator: u8 = num_str.parse().ok()?;
            let denominator: u32 = den_str.parse().ok()?;
            if numerator == 0 || !denominator.is_power_of_two() {
                return None;
            }
            Some(Event::Meta {
                kind: meta_kind::TIME_SIGNATURE,
                // 24 MIDI clocks per metronome click, 8 thirty-seconds per quarter
                data: vec![numerator, denominator.trailing_zeros() as u8, 24, 8],
            })
        }
        "marker" => {
            let text = directive.args.first()?;
            Some(Event::Meta {
                kind: meta_kind::MARKER,
                data: text.as_bytes().to_vec(),
            })
        }
        _ => None,
    }
}

/// Replace meta events matching the directive catalogue with directives
pub fn extract(song: &mut Song) {
    for track in &mut song.tracks {
        for timed in &mut track.events {
            let Event::Meta { kind, data } = &timed.event else {
                continue;
            };
            if let Some(directive) = extract_one(*kind, data) {
                timed.event = Event::Directive(directive);
            }
        }
    }
}

fn extract_one(kind: u8, data: &[u8]) -> Option<Directive> {
    match kind {
        meta_kind::TEMPO if data.len() == 3 => {
            let micros = ((data[0] as u32) << 16) | ((data[1] as u32) << 8) | data[2] as u32;
            if micros == 0 {
                return None;
            }
            let bpm = 60_000_000.0 / micros as f64;
            Some(Directive::new("tempo", vec![format_bpm(bpm)]))
        }
        meta_kind::TIME_SIGNATURE if data.len() >= 2 => {
            let numerator = data[0];
            let denominator = 1u32 << data[1];
            Some(Directive::new(
                "timesig",
                vec![format!("{}/{}", numerator, denominator)],
            ))
        }
        meta_kind::MARKER => Some(Directive::new(
            "marker",
            vec![String::from_utf8_lossy(data).into_owned()],
        )),
        _ => None,
    }
}

/// Print a BPM with at most two decimals, trimming trailing zeros
fn format_bpm(bpm: f64) -> String {
    let rounded = (bpm * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as u64)
    } else {
        format!("{}", rounded)
    }
}
