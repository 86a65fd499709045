//! MIDI <-> MTXT conversion exports
//!
//! The binary side of the surface: decode SMF bytes to MTXT text, and
//! encode edited text back to SMF bytes ready for download.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{self, codec_error};
use crate::models::Event;
use crate::{mtxt, smf, transforms, wasm_info, wasm_log, wasm_warn};

/// Convert SMF bytes to an MTXT document
///
/// # Arguments
/// * `midi_bytes` - Standard MIDI File contents
/// * `format_padding` - Align timestamp and numeric columns (cosmetic only)
#[wasm_bindgen(js_name = midiToMtxt)]
pub fn midi_to_mtxt(midi_bytes: &[u8], format_padding: bool) -> Result<String, JsValue> {
    wasm_info!("midiToMtxt called with {} bytes", midi_bytes.len());

    let song = smf::decode(midi_bytes).map_err(|e| codec_error("MIDI decode error", e))?;
    wasm_log!(
        "  decoded {} tracks, {} events, ppq {}",
        song.tracks.len(),
        song.event_count(),
        song.ppq
    );

    let text = mtxt::write_mtxt(&song, format_padding);

    wasm_info!("midiToMtxt completed: {} bytes of text", text.len());
    Ok(text)
}

/// Convert an MTXT document to SMF bytes
///
/// Known directives (tempo, timesig, marker) are materialized into their
/// literal meta events before encoding; any others are skipped.
///
/// # Returns
/// MIDI file bytes as Uint8Array, ready for download
#[wasm_bindgen(js_name = mtxtToMidi)]
pub fn mtxt_to_midi(mtxt_content: &str) -> Result<js_sys::Uint8Array, JsValue> {
    wasm_info!("mtxtToMidi called with {} bytes of text", mtxt_content.len());

    let mut song = mtxt::parse_mtxt(mtxt_content).map_err(|e| codec_error("MTXT parse error", e))?;

    transforms::directives::materialize(&mut song);
    let skipped = song
        .tracks
        .iter()
        .flat_map(|t| t.events.iter())
        .filter(|e| matches!(e.event, Event::Directive(_)))
        .count();
    if skipped > 0 {
        wasm_warn!("{} unknown directives not encodable, skipped", skipped);
    }

    let midi_bytes = smf::encode(&song).map_err(|e| codec_error("MIDI encode error", e))?;

    // Convert to Uint8Array for JavaScript
    let uint8_array = js_sys::Uint8Array::new_with_length(midi_bytes.len() as u32);
    uint8_array.copy_from(&midi_bytes);

    wasm_info!("mtxtToMidi completed: {} bytes", midi_bytes.len());
    Ok(uint8_array)
}

#[derive(Serialize)]
struct SongSummary {
    ppq: u16,
    tracks: usize,
    events: usize,
}

/// Parse an MTXT document and return `{ppq, tracks, events}` for display
#[wasm_bindgen(js_name = songInfo)]
pub fn song_info(mtxt_content: &str) -> Result<JsValue, JsValue> {
    let song = mtxt::parse_mtxt(mtxt_content).map_err(|e| codec_error("MTXT parse error", e))?;

    let summary = SongSummary {
        ppq: song.ppq,
        tracks: song.tracks.len(),
        events: song.event_count(),
    };
    helpers::serialize(&summary, "Failed to serialize song info")
}
