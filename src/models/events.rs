//! Event variants and directive records
//!
//! Events carry raw MIDI value ranges (channel 0-15, data bytes 0-127).
//! Out-of-range values are rejected at the parsing boundaries, never
//! wrapped, so constructed events are always valid.

use serde::{Deserialize, Serialize};

/// Well-known SMF meta kinds used by the text codec and the directive passes
pub mod meta_kind {
    pub const TEXT: u8 = 0x01;
    pub const COPYRIGHT: u8 = 0x02;
    pub const TRACK_NAME: u8 = 0x03;
    pub const INSTRUMENT: u8 = 0x04;
    pub const LYRIC: u8 = 0x05;
    pub const MARKER: u8 = 0x06;
    pub const CUE: u8 = 0x07;
    pub const END_OF_TRACK: u8 = 0x2F;
    pub const TEMPO: u8 = 0x51;
    pub const TIME_SIGNATURE: u8 = 0x58;
}

/// A structured textual annotation, not a playable event until materialized
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    /// Directive name as written after `@` in MTXT (e.g. "tempo", "marker")
    pub name: String,

    /// Positional arguments, unescaped
    pub args: Vec<String>,
}

impl Directive {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A single sequenced event
///
/// `Meta` doubles as the opaque passthrough record: kinds below 0x80 are
/// real SMF meta events (written as `FF kind len data`), kinds at 0x80 and
/// above preserve an unsupported status byte verbatim (pitch bend,
/// aftertouch, sysex) so re-encoding reproduces it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    NoteOn {
        channel: u8,
        key: u8,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        key: u8,
        velocity: u8,
    },
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    ProgramChange {
        channel: u8,
        program: u8,
    },
    Meta {
        kind: u8,
        data: Vec<u8>,
    },
    Directive(Directive),
}

impl Event {
    /// The channel this event addresses, if any
    ///
    /// Meta and directive records are channel-less and survive every
    /// channel filter.
    pub fn channel(&self) -> Option<u8> {
        match self {
            Event::NoteOn { channel, .. }
            | Event::NoteOff { channel, .. }
            | Event::ControlChange { channel, .. }
            | Event::ProgramChange { channel, .. } => Some(*channel),
            // Raw passthrough of a channel voice message keeps its channel
            Event::Meta { kind, .. } if *kind >= 0x80 && *kind < 0xF0 => Some(kind & 0x0F),
            Event::Meta { .. } | Event::Directive(_) => None,
        }
    }

    /// Fixed priority class for tie-breaking simultaneous events
    ///
    /// Meta/Directive < ControlChange < ProgramChange < NoteOff < NoteOn,
    /// so controllers and program changes land before the notes they affect
    /// and note releases precede re-attacks at the same tick.
    pub fn class_rank(&self) -> u8 {
        match self {
            Event::Meta { .. } | Event::Directive(_) => 0,
            Event::ControlChange { .. } => 1,
            Event::ProgramChange { .. } => 2,
            Event::NoteOff { .. } => 3,
            Event::NoteOn { .. } => 4,
        }
    }

    /// True for NoteOn with a non-zero velocity (an attack)
    pub fn is_attack(&self) -> bool {
        matches!(self, Event::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// True for NoteOff or the NoteOn-with-velocity-0 idiom (a release)
    pub fn is_release(&self) -> bool {
        match self {
            Event::NoteOff { .. } => true,
            Event::NoteOn { velocity, .. } => *velocity == 0,
            _ => false,
        }
    }
}
