//! Transform exports
//!
//! The engine surface: a descriptor value object configured field by field
//! from JavaScript, applied to MTXT text in one call. A JSON entry point
//! accepts the same descriptor as a serialized configuration.

use wasm_bindgen::prelude::*;

use crate::api::helpers::codec_error;
use crate::transforms::{self, TransformDescriptor};
use crate::{mtxt, wasm_info, wasm_log};

/// JavaScript-facing transform configuration
///
/// Constructed fresh per UI action, configured, passed once and released;
/// it carries no state across calls.
#[wasm_bindgen]
pub struct WasmTransformDescriptor {
    pub apply_directives: bool,
    pub extract_directives: bool,
    pub sort_by_time: bool,
    pub merge_notes: bool,
    pub group_channels: bool,
    pub quantize_grid: u32,
    pub quantize_swing: f32,
    pub quantize_humanize: f32,
    pub transpose_amount: i32,
    pub offset_amount: f32,
    include_channels: Vec<u8>,
    exclude_channels: Vec<u8>,
}

#[wasm_bindgen]
impl WasmTransformDescriptor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            apply_directives: false,
            extract_directives: false,
            sort_by_time: false,
            merge_notes: false,
            group_channels: false,
            quantize_grid: 0,
            quantize_swing: 0.0,
            quantize_humanize: 0.0,
            transpose_amount: 0,
            offset_amount: 0.0,
            include_channels: Vec::new(),
            exclude_channels: Vec::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn include_channels(&self) -> Vec<u8> {
        self.include_channels.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_include_channels(&mut self, channels: Vec<u8>) {
        self.include_channels = channels;
    }

    #[wasm_bindgen(getter)]
    pub fn exclude_channels(&self) -> Vec<u8> {
        self.exclude_channels.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_exclude_channels(&mut self, channels: Vec<u8>) {
        self.exclude_channels = channels;
    }
}

impl From<&WasmTransformDescriptor> for TransformDescriptor {
    fn from(w: &WasmTransformDescriptor) -> Self {
        Self {
            apply_directives: w.apply_directives,
            extract_directives: w.extract_directives,
            sort_by_time: w.sort_by_time,
            merge_notes: w.merge_notes,
            group_channels: w.group_channels,
            quantize_grid: w.quantize_grid,
            quantize_swing: w.quantize_swing,
            quantize_humanize: w.quantize_humanize,
            transpose_amount: w.transpose_amount,
            offset_amount: w.offset_amount,
            include_channels: w.include_channels.clone(),
            exclude_channels: w.exclude_channels.clone(),
        }
    }
}

/// Apply a transform descriptor to an MTXT document
#[wasm_bindgen(js_name = applyTransforms)]
pub fn apply_transforms(
    mtxt_content: &str,
    descriptor: &WasmTransformDescriptor,
    format_padding: bool,
) -> Result<String, JsValue> {
    run_transforms(mtxt_content, &descriptor.into(), format_padding)
}

/// Apply a transform descriptor given as a JSON object string
///
/// Accepts the same fields as `WasmTransformDescriptor`; missing fields
/// take their defaults.
#[wasm_bindgen(js_name = applyTransformsJson)]
pub fn apply_transforms_json(
    mtxt_content: &str,
    descriptor_json: &str,
    format_padding: bool,
) -> Result<String, JsValue> {
    let descriptor: TransformDescriptor = serde_json::from_str(descriptor_json)
        .map_err(|e| codec_error("Descriptor parse error", e))?;
    run_transforms(mtxt_content, &descriptor, format_padding)
}

fn run_transforms(
    mtxt_content: &str,
    descriptor: &TransformDescriptor,
    format_padding: bool,
) -> Result<String, JsValue> {
    wasm_info!("applyTransforms called with {} bytes of text", mtxt_content.len());

    let song = mtxt::parse_mtxt(mtxt_content).map_err(|e| codec_error("MTXT parse error", e))?;

    let (transformed, report) =
        transforms::apply(&song, descriptor).map_err(|e| codec_error("Transform error", e))?;

    if !report.is_empty() {
        wasm_log!(
            "  normalized: {} times clamped, {} keys clamped, {} events dropped",
            report.times_clamped,
            report.keys_clamped,
            report.events_dropped
        );
    }

    let text = mtxt::write_mtxt(&transformed, format_padding);

    wasm_info!("applyTransforms completed: {} events", transformed.event_count());
    Ok(text)
}
