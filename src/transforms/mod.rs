//! Transform engine
//!
//! One entry point applies a descriptor to a song and returns a new song
//! plus an informational report. Passes compose in a fixed order so a
//! repeated call with the same descriptor is idempotent wherever the
//! individual operation is.

pub mod descriptor;
pub mod directives;
pub mod filter;
pub mod group;
pub mod merge;
pub mod offset;
pub mod quantize;
pub mod transpose;

pub use descriptor::{DescriptorError, TransformDescriptor};
pub use merge::MERGE_TOLERANCE_TICKS;

use serde::{Deserialize, Serialize};

use crate::models::Song;

/// Informational conditions from one engine run
///
/// Clamping and filtering are defined normalizations, not errors; the
/// counts are surfaced here for callers that want to report them.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Event times clamped to zero
    pub times_clamped: usize,
    /// Note keys clamped into 0..=127
    pub keys_clamped: usize,
    /// Events removed by channel filtering
    pub events_dropped: usize,
}

impl TransformReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply a transform descriptor to a song, leaving the input untouched
///
/// Pass order is fixed: extract_directives, apply_directives, channel
/// filtering, the active scalar transform, merge_notes, group_channels,
/// sort_by_time.
pub fn apply(
    song: &Song,
    descriptor: &TransformDescriptor,
) -> Result<(Song, TransformReport), DescriptorError> {
    descriptor.validate()?;

    let mut out = song.clone();
    let mut report = TransformReport::default();

    if descriptor.extract_directives {
        directives::extract(&mut out);
    }
    if descriptor.apply_directives {
        directives::materialize(&mut out);
    }
    if !descriptor.include_channels.is_empty() {
        report.events_dropped += filter::include(&mut out, &descriptor.include_channels);
    }
    if !descriptor.exclude_channels.is_empty() {
        report.events_dropped += filter::exclude(&mut out, &descriptor.exclude_channels);
    }
    if descriptor.quantize_active() {
        quantize::apply(
            &mut out,
            descriptor.quantize_grid,
            descriptor.quantize_swing,
            descriptor.quantize_humanize,
            &mut report,
        );
    }
    if descriptor.transpose_amount != 0 {
        transpose::apply(&mut out, descriptor.transpose_amount, &mut report);
    }
    if descriptor.offset_amount != 0.0 {
        offset::apply(&mut out, descriptor.offset_amount, &mut report);
    }
    if descriptor.merge_notes {
        merge::apply(&mut out, MERGE_TOLERANCE_TICKS);
    }
    if descriptor.group_channels {
        group::apply(&mut out);
    }
    if descriptor.sort_by_time {
        out.canonicalize();
    }

    Ok((out, report))
}
