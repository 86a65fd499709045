//! MTXT Codec WASM API
//!
//! This module provides the JavaScript-facing API for the codec and the
//! transform engine. It includes shared utilities for serialization and
//! error handling, plus the exported functions organized by domain.
//!
//! # Module Structure
//!
//! - `helpers`: console logging, serialization, error conversion
//! - `convert`: MIDI <-> MTXT conversion exports
//! - `transform`: transform descriptor and engine exports

pub mod convert;
pub mod helpers;
pub mod transform;

// Re-export the public API surface
pub use convert::{midi_to_mtxt, mtxt_to_midi, song_info};
pub use transform::{apply_transforms, apply_transforms_json, WasmTransformDescriptor};
