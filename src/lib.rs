//! MIDI <-> MTXT Codec WASM Module
//!
//! This is the main WASM module for the MTXT editor. It provides the
//! binary codec (Standard MIDI File bytes to the event model and back),
//! the MTXT text codec, and the transform engine the UI drives.

pub mod api;
pub mod models;
pub mod mtxt;
pub mod smf;
pub mod transforms;

// Re-export commonly used types
pub use models::{Directive, Event, Song, TimedEvent, Track};
pub use transforms::{DescriptorError, TransformDescriptor, TransformReport};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("MTXT codec WASM module initialized");
}
