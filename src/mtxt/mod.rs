//! MTXT text codec
//!
//! One line per event: a `beat:tick` timestamp, an event tag, and named
//! fields. Directive lines use `@name` in the tag position. A `ppq` header
//! fixes the tick resolution and `track <n>` lines open track sections.

mod escape;
mod parser;
mod writer;

pub use parser::parse_mtxt;
pub use writer::write_mtxt;

use thiserror::Error;

use crate::models::events::meta_kind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MtxtParseError {
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("line {line}: unknown event type '{tag}'")]
    UnknownEventType { line: usize, tag: String },

    #[error("line {line}: field '{field}' value {value} out of range")]
    FieldRange {
        line: usize,
        field: String,
        value: i64,
    },
}

pub type Result<T> = std::result::Result<T, MtxtParseError>;

/// Symbolic name for a meta kind, where one exists
pub(crate) fn meta_kind_name(kind: u8) -> Option<&'static str> {
    match kind {
        meta_kind::TEXT => Some("text"),
        meta_kind::COPYRIGHT => Some("copyright"),
        meta_kind::TRACK_NAME => Some("name"),
        meta_kind::INSTRUMENT => Some("instrument"),
        meta_kind::LYRIC => Some("lyric"),
        meta_kind::MARKER => Some("marker"),
        meta_kind::CUE => Some("cue"),
        meta_kind::TEMPO => Some("tempo"),
        meta_kind::TIME_SIGNATURE => Some("timesig"),
        _ => None,
    }
}

pub(crate) fn meta_kind_from_name(name: &str) -> Option<u8> {
    match name {
        "text" => Some(meta_kind::TEXT),
        "copyright" => Some(meta_kind::COPYRIGHT),
        "name" => Some(meta_kind::TRACK_NAME),
        "instrument" => Some(meta_kind::INSTRUMENT),
        "lyric" => Some(meta_kind::LYRIC),
        "marker" => Some(meta_kind::MARKER),
        "cue" => Some(meta_kind::CUE),
        "tempo" => Some(meta_kind::TEMPO),
        "timesig" => Some(meta_kind::TIME_SIGNATURE),
        _ => None,
    }
}

/// Meta kinds whose payload reads naturally as text
pub(crate) fn meta_kind_is_text(kind: u8) -> bool {
    (meta_kind::TEXT..=meta_kind::CUE).contains(&kind)
}

pub(crate) fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

pub(crate) fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
