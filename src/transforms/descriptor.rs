//! Transform descriptor and its validation
//!
//! A short-lived value object: constructed fresh per call, configured field
//! by field, passed by reference into the engine, and carrying no state
//! across calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for one engine invocation
///
/// Boolean switches may combine freely; of the scalar parameters, at most
/// one family may be active per call. The quantize triple (grid, swing,
/// humanize) counts as a single family since swing and humanize are defined
/// relative to the quantization subdivision.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct TransformDescriptor {
    pub apply_directives: bool,
    pub extract_directives: bool,
    pub sort_by_time: bool,
    pub merge_notes: bool,
    pub group_channels: bool,
    /// Grid subdivisions per quarter note; 0 disables quantization
    pub quantize_grid: u32,
    /// Fraction of a subdivision to delay off-beat events, 0..=1
    pub quantize_swing: f32,
    /// Jitter magnitude as a fraction of a subdivision, 0..=1
    pub quantize_humanize: f32,
    /// Semitones added to note keys, clamped to the MIDI range
    pub transpose_amount: i32,
    /// Beats added to every event time, clamped at zero
    pub offset_amount: f32,
    pub include_channels: Vec<u8>,
    pub exclude_channels: Vec<u8>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DescriptorError {
    #[error("invalid descriptor: include_channels and exclude_channels are mutually exclusive")]
    ConflictingChannelFilters,

    #[error("invalid descriptor: more than one scalar transform active ({active:?})")]
    MultipleScalarTransforms { active: Vec<&'static str> },

    #[error("invalid descriptor: {field} value {value} out of range")]
    ValueOutOfRange { field: &'static str, value: f64 },
}

impl TransformDescriptor {
    /// True when any quantization parameter is engaged
    pub fn quantize_active(&self) -> bool {
        self.quantize_grid > 0 || self.quantize_swing > 0.0 || self.quantize_humanize > 0.0
    }

    /// Check the cross-field invariants before the engine runs
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if !(0.0..=1.0).contains(&self.quantize_swing) {
            return Err(DescriptorError::ValueOutOfRange {
                field: "quantize_swing",
                value: self.quantize_swing as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.quantize_humanize) {
            return Err(DescriptorError::ValueOutOfRange {
                field: "quantize_humanize",
                value: self.quantize_humanize as f64,
            });
        }
        for &channel in self.include_channels.iter().chain(&self.exclude_channels) {
            if channel > 15 {
                return Err(DescriptorError::ValueOutOfRange {
                    field: "channel",
                    value: channel as f64,
                });
            }
        }
        if !self.include_channels.is_empty() && !self.exclude_channels.is_empty() {
            return Err(DescriptorError::ConflictingChannelFilters);
        }

        let mut active = Vec::new();
        if self.quantize_active() {
            active.push("quantize");
        }
        if self.transpose_amount != 0 {
            active.push("transpose");
        }
        if self.offset_amount != 0.0 {
            active.push("offset");
        }
        if !self.include_channels.is_empty() {
            active.push("include_channels");
        }
        if !self.exclude_channels.is_empty() {
            active.push("exclude_channels");
        }
        if active.len() > 1 {
            return Err(DescriptorError::MultipleScalarTransforms { active });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor_is_valid() {
        assert_eq!(TransformDescriptor::default().validate(), Ok(()));
    }

    #[test]
    fn test_conflicting_filters_rejected() {
        let descriptor = TransformDescriptor {
            include_channels: vec![1],
            exclude_channels: vec![2],
            ..Default::default()
        };
        assert_eq!(
            descriptor.validate(),
            Err(DescriptorError::ConflictingChannelFilters)
        );
    }

    #[test]
    fn test_two_scalars_rejected() {
        let descriptor = TransformDescriptor {
            quantize_grid: 4,
            transpose_amount: 2,
            ..Default::default()
        };
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::MultipleScalarTransforms { .. })
        ));
    }

    #[test]
    fn test_quantize_triple_counts_as_one_family() {
        let descriptor = TransformDescriptor {
            quantize_grid: 4,
            quantize_swing: 0.5,
            quantize_humanize: 0.1,
            ..Default::default()
        };
        assert_eq!(descriptor.validate(), Ok(()));
    }

    #[test]
    fn test_swing_out_of_range_rejected() {
        let descriptor = TransformDescriptor {
            quantize_swing: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::ValueOutOfRange {
                field: "quantize_swing",
                ..
            })
        ));
    }

    #[test]
    fn test_channel_out_of_range_rejected() {
        let descriptor = TransformDescriptor {
            include_channels: vec![16],
            ..Default::default()
        };
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::ValueOutOfRange { field: "channel", .. })
        ));
    }

    #[test]
    fn test_booleans_combine_freely() {
        let descriptor = TransformDescriptor {
            apply_directives: true,
            extract_directives: true,
            sort_by_time: true,
            merge_notes: true,
            group_channels: true,
            ..Default::default()
        };
        assert_eq!(descriptor.validate(), Ok(()));
    }
}
