//! Pure calculation functions for crop dimensions and breakpoint ranges.
//!
//! All functions here are pure and testable without a backend.

use crate::types::{MediaQuery, Property, Target};

/// Crop size to request from the backend. Not rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// The untouched natural size.
    pub fn natural(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }
}

/// Resolve the crop size for a target on one axis, preserving aspect ratio.
///
/// Only downscales: a target not smaller than the natural size on its axis
/// keeps the natural `(width, height)`.
///
/// # Examples
/// ```
/// # use cover_rig::imaging::{Dimensions, resolve_dimensions};
/// # use cover_rig::types::Target;
/// // 2000x1000 cover, 800px wide → 800x400
/// assert_eq!(
///     resolve_dimensions((2000, 1000), Target::Width(800.0)),
///     Dimensions { width: 800.0, height: 400.0 }
/// );
///
/// // Never upscales
/// assert_eq!(
///     resolve_dimensions((2000, 1000), Target::Width(3000.0)),
///     Dimensions::natural(2000, 1000)
/// );
/// ```
pub fn resolve_dimensions(natural: (u32, u32), target: Target) -> Dimensions {
    let (nat_w, nat_h) = natural;
    let aspect = nat_w as f64 / nat_h as f64;

    match target {
        Target::Width(w) if w < nat_w as f64 => Dimensions {
            width: w,
            height: w / aspect,
        },
        Target::Height(h) if h < nat_h as f64 => Dimensions {
            width: h * aspect,
            height: h,
        },
        _ => Dimensions::natural(nat_w, nat_h),
    }
}

/// Split breakpoints into ordered, non-overlapping media query ranges.
///
/// For sorted breakpoints `b0 < b1 < … < bn`:
///
/// ```text
/// (max-P: b0-1px)                         → b0-1
/// (min-P: b0px) and (max-P: b1-1px)       → b1-1
/// …
/// (min-P: bn-1px) and (max-P: bn-1px)     → bn-1
/// (min-P: bnpx)                           → bn
/// ```
///
/// The last breakpoint always yields an extra open-ended `min` range, so a
/// single breakpoint produces two items.
pub fn partition_breakpoints(
    breakpoints: &[f64],
    property: Property,
    selector: &str,
) -> Vec<MediaQuery> {
    let mut sorted = breakpoints.to_vec();
    sorted.sort_by(f64::total_cmp);

    let last = sorted.len().saturating_sub(1);
    let mut items = Vec::with_capacity(sorted.len() + 1);

    for (index, &breakpoint) in sorted.iter().enumerate() {
        let max = breakpoint - 1.0;
        let query = if index == 0 {
            format!("(max-{property}: {max}px)")
        } else {
            let min = sorted[index - 1];
            format!("(min-{property}: {min}px) and (max-{property}: {max}px)")
        };
        items.push(MediaQuery {
            query,
            selector: selector.to_string(),
            target: property.target(max),
        });

        if index == last {
            items.push(MediaQuery {
                query: format!("(min-{property}: {breakpoint}px)"),
                selector: selector.to_string(),
                target: property.target(breakpoint),
            });
        }
    }

    items
}

/// Breakpoints worth a `srcset` entry: strictly narrower than the natural
/// width, ascending.
///
/// Returns the kept widths and whether anything was dropped. When something
/// was dropped the caller appends a full-size entry so the largest rendered
/// size is still covered.
pub fn srcset_widths(natural_width: u32, breakpoints: &[f64]) -> (Vec<f64>, bool) {
    let mut kept: Vec<f64> = breakpoints
        .iter()
        .copied()
        .filter(|&b| b < natural_width as f64)
        .collect();
    kept.sort_by(f64::total_cmp);
    let dropped = breakpoints.len() > kept.len();
    (kept, dropped)
}
