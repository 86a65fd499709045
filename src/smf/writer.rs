//! Event model -> SMF byte stream
//!
//! Encoding canonicalizes a working copy first so per-track delta times are
//! non-negative, then serializes each track with opportunistic running
//! status. Chunk lengths are computed after event serialization.

use crate::models::events::meta_kind;
use crate::models::{Event, Song, Track};

use super::Result;

/// Encode a song as a Standard MIDI File
///
/// One track writes format 0, several write format 1. Directive records are
/// not playable events and are skipped; callers materialize them first.
pub fn encode(song: &Song) -> Result<Vec<u8>> {
    let mut canonical = song.clone();
    canonical.canonicalize();

    let format: u16 = if canonical.tracks.len() <= 1 { 0 } else { 1 };

    let mut out = Vec::new();
    out.extend_from_slice(b"MThd");
    push_u32(&mut out, 6);
    push_u16(&mut out, format);
    push_u16(&mut out, canonical.tracks.len() as u16);
    push_u16(&mut out, canonical.ppq);

    for track in &canonical.tracks {
        let body = write_track(track);
        out.extend_from_slice(b"MTrk");
        push_u32(&mut out, body.len() as u32);
        out.extend_from_slice(&body);
    }

    Ok(out)
}

/// Serialize one track body, folding running status through the event run
fn write_track(track: &Track) -> Vec<u8> {
    let mut body = Vec::new();
    let mut last_time = 0u64;
    let mut running_status: Option<u8> = None;

    for timed in &track.events {
        let event_bytes = match &timed.event {
            Event::NoteOn {
                channel,
                key,
                velocity,
            } => Some((0x90 | channel, vec![*key, *velocity])),
            Event::NoteOff {
                channel,
                key,
                velocity,
            } => Some((0x80 | channel, vec![*key, *velocity])),
            Event::ControlChange {
                channel,
                controller,
                value,
            } => Some((0xB0 | channel, vec![*controller, *value])),
            Event::ProgramChange { channel, program } => Some((0xC0 | channel, vec![*program])),
            Event::Meta { .. } => None,
            Event::Directive(_) => continue,
        };

        let delta = (timed.time - last_time) as u32;
        last_time = timed.time;
        write_vlq(&mut body, delta);

        match (&timed.event, event_bytes) {
            (_, Some((status, data))) => {
                if running_status != Some(status) {
                    body.push(status);
                    running_status = Some(status);
                }
                body.extend_from_slice(&data);
            }
            (Event::Meta { kind, data }, None) => {
                if *kind < 0x80 {
                    body.push(0xFF);
                    body.push(*kind);
                    write_vlq(&mut body, data.len() as u32);
                    body.extend_from_slice(data);
                    running_status = None;
                } else if *kind == 0xF0 || *kind == 0xF7 {
                    body.push(*kind);
                    write_vlq(&mut body, data.len() as u32);
                    body.extend_from_slice(data);
                    running_status = None;
                } else if *kind < 0xF0 {
                    // Raw channel voice passthrough participates in running status
                    if running_status != Some(*kind) {
                        body.push(*kind);
                        running_status = Some(*kind);
                    }
                    body.extend_from_slice(data);
                } else {
                    body.push(*kind);
                    body.extend_from_slice(data);
                    running_status = None;
                }
            }
            _ => unreachable!("directives are skipped above"),
        }
    }

    // End of track
    body.push(0x00);
    body.push(0xFF);
    body.push(meta_kind::END_OF_TRACK);
    body.push(0x00);

    body
}

/// Write a MIDI variable-length quantity, most significant group first
fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    let mut bytes = [0u8; 4];
    let mut i = 3;
    bytes[i] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        i -= 1;
        bytes[i] = ((value & 0x7F) | 0x80) as u8;
        value >>= 7;
    }
    buf.extend_from_slice(&bytes[i..]);
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}
