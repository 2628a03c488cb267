//! Parameter maps sent to the URL backend.
//!
//! The generators decide *what* crop to request ([`Dimensions`]); this module
//! turns that into the flat [`Params`] map the backend receives. Caller
//! params come first, computed `input`/`width`/`height` are written last and
//! win on key collision.

use super::calculations::Dimensions;
use crate::types::{Params, pixel_value};
use serde_json::Value;

/// Build a fresh param map: `base` entries, then the computed crop.
pub fn crop_params(base: &Params, src: &str, dims: Dimensions) -> Params {
    let mut params = base.clone();
    params.insert("input".to_string(), Value::String(src.to_string()));
    params.insert("width".to_string(), pixel_value(dims.width));
    params.insert("height".to_string(), pixel_value(dims.height));
    params
}

/// Merge `overlay` on top of `base`; `overlay` wins on collision.
pub fn merge_params(base: &Params, overlay: &Params) -> Params {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
