//! Input validation shared by all generators.
//!
//! Checks run in a fixed order and stop at the first violation:
//!
//! ```text
//! block → cover → cover.src → cover.width → cover.height → config → graph
//! ```
//!
//! Each generator then checks its own fields (items, property, selector,
//! breakpoints) after these shared checks.

use thiserror::Error;

use crate::types::Block;

/// Missing or malformed caller input. Variants differ only by message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("block not provided")]
    MissingBlock,
    #[error("block must have a cover image")]
    MissingCover,
    #[error("block cover image must have a src")]
    MissingSrc,
    #[error("block cover image must have a width")]
    MissingWidth,
    #[error("block cover image must have a height")]
    MissingHeight,
    #[error("block cover image must have non-zero dimensions")]
    ZeroDimension,
    #[error("backend config not provided")]
    MissingConfig,
    #[error("graph name not provided")]
    MissingGraph,
    #[error("query items not provided")]
    MissingItems,
    #[error("media query not provided")]
    MissingQuery,
    #[error("selector not provided")]
    MissingSelector,
    #[error("width or height not provided")]
    MissingTarget,
    #[error("width or height must be provided, but not both")]
    ConflictingTarget,
    #[error("property not provided")]
    MissingProperty,
    #[error("invalid property provided: {0}")]
    InvalidProperty(String),
    #[error("breakpoints not provided")]
    MissingBreakpoints,
}

/// A cover image with every field present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cover<'a> {
    pub src: &'a str,
    pub width: u32,
    pub height: u32,
}

/// Validated view of the shared inputs.
#[derive(Debug)]
pub struct Checked<'a, C> {
    pub cover: Cover<'a>,
    pub config: &'a C,
    pub graph: &'a str,
}

/// Run the shared checks and borrow the validated inputs.
pub fn validate<'a, C>(
    block: Option<&'a Block>,
    config: Option<&'a C>,
    graph: Option<&'a str>,
) -> Result<Checked<'a, C>, InputError> {
    let block = block.ok_or(InputError::MissingBlock)?;
    let cover = block.cover.as_ref().ok_or(InputError::MissingCover)?;
    let src = cover.src.as_deref().ok_or(InputError::MissingSrc)?;
    let width = cover.width.ok_or(InputError::MissingWidth)?;
    let height = cover.height.ok_or(InputError::MissingHeight)?;
    if width == 0 || height == 0 {
        return Err(InputError::ZeroDimension);
    }
    let config = config.ok_or(InputError::MissingConfig)?;
    let graph = graph.ok_or(InputError::MissingGraph)?;

    Ok(Checked {
        cover: Cover { src, width, height },
        config,
        graph,
    })
}
