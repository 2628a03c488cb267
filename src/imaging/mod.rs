//! Crop math and URL building for remote image graphs.
//!
//! | Concern | Module |
//! |---|---|
//! | **Crop size** | [`resolve_dimensions`] (aspect-preserving, downscale only) |
//! | **Breakpoint ranges** | [`partition_breakpoints`] |
//! | **srcset widths** | [`srcset_widths`] |
//! | **Param maps** | [`crop_params`], [`merge_params`] |
//! | **URL building** | [`UrlBuilder`] trait + [`SignedUrlBuilder`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and range math (unit testable)
//! - **Parameters**: Param maps handed to the backend
//! - **Backend**: [`UrlBuilder`] trait + [`BackendError`]
//! - **Signed backend**: [`SignedUrlBuilder`] for [`GraphServer`] configs

pub mod backend;
mod calculations;
mod params;
pub mod signed_backend;

pub use backend::{BackendError, UrlBuilder};
pub use calculations::{Dimensions, partition_breakpoints, resolve_dimensions, srcset_widths};
pub use params::{crop_params, merge_params};
pub use signed_backend::{GraphServer, SignedUrlBuilder};
