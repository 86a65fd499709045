//! Event model -> MTXT text
//!
//! The `padding` flag only affects cosmetics: timestamps right-align to a
//! common width and numeric fields zero-pad, but the parsed result is
//! identical either way.

use std::fmt::Write;

use crate::models::{Event, Song};

use super::escape::escape_string;
use super::{meta_kind_is_text, meta_kind_name, to_hex};

/// Serialize a song as an MTXT document
pub fn write_mtxt(song: &Song, padding: bool) -> String {
    let time_width = if padding {
        calculate_timestamp_width(song)
    } else {
        0
    };

    let mut out = String::new();
    out.push_str("mtxt 1\n");
    let _ = writeln!(out, "ppq {}", song.ppq);

    for (index, track) in song.tracks.iter().enumerate() {
        out.push('\n');
        let _ = writeln!(out, "track {}", index);
        for timed in &track.events {
            let stamp = format_time(timed.time, song.ppq);
            let _ = write!(out, "  {:>width$} ", stamp, width = time_width);
            write_event(&mut out, &timed.event, padding);
            out.push('\n');
        }
    }

    out
}

/// Width of the longest timestamp in the song
fn calculate_timestamp_width(song: &Song) -> usize {
    song.tracks
        .iter()
        .flat_map(|t| t.events.iter())
        .map(|e| format_time(e.time, song.ppq).len())
        .max()
        .unwrap_or(0)
}

fn format_time(time: u64, ppq: u16) -> String {
    format!("{}:{:03}", time / ppq as u64, time % ppq as u64)
}

fn write_event(out: &mut String, event: &Event, padding: bool) {
    match event {
        Event::NoteOn {
            channel,
            key,
            velocity,
        } => {
            let _ = write!(
                out,
                "on ch={} key={} vel={}",
                channel,
                num(*key, padding),
                num(*velocity, padding)
            );
        }
        Event::NoteOff {
            channel,
            key,
            velocity,
        } => {
            let _ = write!(
                out,
                "off ch={} key={} vel={}",
                channel,
                num(*key, padding),
                num(*velocity, padding)
            );
        }
        Event::ControlChange {
            channel,
            controller,
            value,
        } => {
            let _ = write!(
                out,
                "cc ch={} ctrl={} val={}",
                channel,
                num(*controller, padding),
                num(*value, padding)
            );
        }
        Event::ProgramChange { channel, program } => {
            let _ = write!(out, "prog ch={} num={}", channel, num(*program, padding));
        }
        Event::Meta { kind, data } => {
            match meta_kind_name(*kind) {
                Some(name) => {
                    let _ = write!(out, "meta {}", name);
                }
                None => {
                    let _ = write!(out, "meta 0x{:02X}", kind);
                }
            }
            if meta_kind_is_text(*kind) {
                let text = String::from_utf8_lossy(data);
                let _ = write!(out, " \"{}\"", escape_string(&text));
            } else {
                let _ = write!(out, " data={}", to_hex(data));
            }
        }
        Event::Directive(directive) => {
            let _ = write!(out, "@{}", directive.name);
            for arg in &directive.args {
                if needs_quoting(arg) {
                    let _ = write!(out, " \"{}\"", escape_string(arg));
                } else {
                    let _ = write!(out, " {}", arg);
                }
            }
        }
    }
}

/// Zero-pad a data byte to three digits when padding is on
fn num(value: u8, padding: bool) -> String {
    if padding {
        format!("{:03}", value)
    } else {
        value.to_string()
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\')
}
