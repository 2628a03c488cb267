//! Shared test utilities for the cover-rig test suite.
//!
//! Builders for the option structs every generator takes, so tests only
//! spell out the fields they care about.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let rig = Rig::new(MockBuilder::new());
//! let css = rig.generate(&media_options(
//!     cover_source("a.jpg", 1000, 500),
//!     vec![width_item("(max-width: 399px)", ".hero", 399.0)],
//! ))?;
//! ```

use serde_json::Value;

use crate::rig::{BreakpointOptions, MediaOptions, Source, SrcsetOptions};
use crate::types::{Block, Params, QueryItem};

// =========================================================================
// Sources
// =========================================================================

/// Fully valid source for the mock backend, graph `crop`.
pub fn cover_source(src: &str, width: u32, height: u32) -> Source<()> {
    Source::new(Block::with_cover(src, width, height), (), "crop")
}

/// Unwrap a `json!({...})` literal into a param map. Panics on non-objects.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object for params, got {other}"),
    }
}

// =========================================================================
// Option builders
// =========================================================================

pub fn width_item(query: &str, selector: &str, width: f64) -> QueryItem {
    QueryItem {
        query: Some(query.to_string()),
        selector: Some(selector.to_string()),
        width: Some(width),
        height: None,
    }
}

pub fn media_options<C>(source: Source<C>, items: Vec<QueryItem>) -> MediaOptions<C> {
    MediaOptions {
        source,
        items: Some(items),
    }
}

pub fn breakpoint_options<C>(
    source: Source<C>,
    property: &str,
    selector: &str,
    breakpoints: Vec<f64>,
) -> BreakpointOptions<C> {
    BreakpointOptions {
        source,
        property: Some(property.to_string()),
        selector: Some(selector.to_string()),
        breakpoints: Some(breakpoints),
    }
}

pub fn srcset_options<C>(source: Source<C>, breakpoints: Vec<f64>) -> SrcsetOptions<C> {
    SrcsetOptions {
        source,
        breakpoints: Some(breakpoints),
    }
}
