//! # cover-rig
//!
//! Responsive-image markup for remote image graphs. Given one cover image
//! with known natural dimensions, cover-rig emits breakpoint-aware
//! background-image CSS or `srcset` strings whose URLs ask an image graph
//! server for exactly the crop each breakpoint needs.
//!
//! # Pipeline
//!
//! ```text
//! block + config + graph + breakpoints/items
//!   → validate       (every required field present, in a fixed order)
//!   → partition      (breakpoints → ordered media query ranges)
//!   → resolve        (aspect-preserving crop, downscale only)
//!   → build URL      (UrlBuilder capability)
//!   → format         (@media blocks / srcset entries)
//! ```
//!
//! Every stage is a pure function of its inputs. The only collaborator is
//! the [`UrlBuilder`](imaging::UrlBuilder) trait, so tests swap in a
//! recording mock and the CLI uses [`SignedUrlBuilder`](imaging::SignedUrlBuilder).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rig`] | The three entry points: `generate`, `breakpoints`, `srcset` |
//! | [`validate`] | Shared input checks and [`InputError`](validate::InputError) |
//! | [`imaging`] | Crop math, breakpoint partitioning, param maps, URL backends |
//! | [`types`] | Blocks, cover images, query items, targets, params |
//! | [`html`] | `<img srcset>` and `<style>` rendering with Maud |
//! | [`job`] | JSON job files, config defaults, parallel batches |
//! | [`config`] | `rig.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Downscale Only
//!
//! A breakpoint wider than the cover never produces an upscaled request; the
//! natural size is requested instead. `srcset` goes further and drops such
//! breakpoints, closing the list with one full-size entry so the largest
//! rendered size is still covered.
//!
//! ## No Rounding
//!
//! Crop dimensions are passed to the backend unrounded (`199.5`). The
//! backend owns pixel rounding, so the same cover and breakpoint always map
//! to the same URL regardless of client.
//!
//! ## Computed Params Win
//!
//! Caller params (filters, quality) are merged first and the computed
//! `input`, `width`, `height` last. A caller can never accidentally request
//! a crop that disagrees with the media query it sits in.

pub mod config;
pub mod html;
pub mod imaging;
pub mod job;
pub mod output;
pub mod rig;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
