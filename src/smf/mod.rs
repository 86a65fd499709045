//! Standard MIDI File codec
//!
//! Hand-written reader and writer for the SMF chunk format: `MThd` header
//! validation, `MTrk` event runs with variable-length delta times and
//! running status, and opaque passthrough of statuses the event model does
//! not interpret.

mod reader;
mod writer;

pub use reader::decode;
pub use writer::encode;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SmfError {
    #[error("malformed header at byte {offset}: {reason}")]
    MalformedHeader { offset: usize, reason: String },

    #[error("truncated track {track} at byte {offset}: {reason}")]
    TruncatedTrack {
        track: usize,
        offset: usize,
        reason: String,
    },

    #[error("invalid variable-length quantity at byte {offset}")]
    InvalidVariableLengthQuantity { offset: usize },
}

pub type Result<T> = std::result::Result<T, SmfError>;
