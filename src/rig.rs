//! Media query and srcset generation.
//!
//! [`Rig`] owns a [`UrlBuilder`] and exposes the three entry points:
//!
//! | Entry point | Input | Output |
//! |---|---|---|
//! | [`Rig::generate`] | explicit query items | CSS `@media` blocks |
//! | [`Rig::breakpoints`] | breakpoint list + property + selector | CSS `@media` blocks |
//! | [`Rig::srcset`] | breakpoint list | `{src, srcset}` |
//!
//! Every call validates its inputs first (see [`validate`](crate::validate)),
//! then resolves a crop per item, merges params and asks the backend for a
//! URL. Calls share no state, so identical inputs produce identical output.
//!
//! ## CSS block format
//!
//! ```text
//! @media (max-width: 399px) {
//!   .hero {
//!     background-image: url('…');
//!   }
//! }
//! ```
//!
//! Blocks are separated by one blank line, with no trailing newline.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::imaging::{
    BackendError, Dimensions, UrlBuilder, crop_params, partition_breakpoints, resolve_dimensions,
    srcset_widths,
};
use crate::types::{Block, MediaQuery, Params, Property, QueryItem, Srcset, Target};
use crate::validate::{Checked, InputError, validate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RigError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Inputs shared by every entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source<C> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<C>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<String>,
    /// Extra params merged under the computed crop params.
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl<C> Default for Source<C> {
    fn default() -> Self {
        Self {
            block: None,
            config: None,
            graph: None,
            params: Params::new(),
        }
    }
}

impl<C> Source<C> {
    pub fn new(block: Block, config: C, graph: impl Into<String>) -> Self {
        Self {
            block: Some(block),
            config: Some(config),
            graph: Some(graph.into()),
            params: Params::new(),
        }
    }

    fn check(&self) -> Result<Checked<'_, C>, InputError> {
        validate(
            self.block.as_ref(),
            self.config.as_ref(),
            self.graph.as_deref(),
        )
    }
}

/// Inputs for [`Rig::generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaOptions<C> {
    #[serde(flatten)]
    pub source: Source<C>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<QueryItem>>,
}

/// Inputs for [`Rig::breakpoints`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointOptions<C> {
    #[serde(flatten)]
    pub source: Source<C>,
    /// `"width"` or `"height"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<f64>>,
}

/// Inputs for [`Rig::srcset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrcsetOptions<C> {
    #[serde(flatten)]
    pub source: Source<C>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<f64>>,
}

/// Generates responsive markup through a URL backend.
#[derive(Debug, Clone, Default)]
pub struct Rig<B> {
    builder: B,
}

impl<B: UrlBuilder> Rig<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// One `@media` block per query item.
    pub fn generate(&self, options: &MediaOptions<B::Config>) -> Result<String, RigError> {
        let checked = options.source.check()?;
        let items = options.items.as_ref().ok_or(InputError::MissingItems)?;
        debug!(graph = checked.graph, items = items.len(), "generating media queries");

        let mut blocks = Vec::with_capacity(items.len());
        for item in items {
            let query = item.to_media_query()?;
            blocks.push(self.media_block(&checked, &options.source.params, &query)?);
        }
        Ok(blocks.join("\n\n"))
    }

    /// `@media` blocks covering every range between sorted breakpoints.
    pub fn breakpoints(&self, options: &BreakpointOptions<B::Config>) -> Result<String, RigError> {
        let checked = options.source.check()?;
        let property: Property = options
            .property
            .as_deref()
            .ok_or(InputError::MissingProperty)?
            .parse()?;
        let selector = options
            .selector
            .as_deref()
            .ok_or(InputError::MissingSelector)?;
        let breakpoints = options
            .breakpoints
            .as_deref()
            .ok_or(InputError::MissingBreakpoints)?;

        let queries = partition_breakpoints(breakpoints, property, selector);
        debug!(
            graph = checked.graph,
            %property,
            breakpoints = breakpoints.len(),
            ranges = queries.len(),
            "partitioned breakpoints"
        );

        let blocks = queries
            .iter()
            .map(|query| self.media_block(&checked, &options.source.params, query))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks.join("\n\n"))
    }

    /// Full-size `src` plus a `srcset` of narrower crops.
    ///
    /// Breakpoints at or above the natural width are dropped; if any were
    /// dropped, a full-size `<src> <W>w` entry closes the list.
    pub fn srcset(&self, options: &SrcsetOptions<B::Config>) -> Result<Srcset, RigError> {
        let checked = options.source.check()?;
        let breakpoints = options
            .breakpoints
            .as_deref()
            .ok_or(InputError::MissingBreakpoints)?;
        let cover = checked.cover;
        let base = &options.source.params;

        let src = self.url_for(
            &checked,
            base,
            Dimensions::natural(cover.width, cover.height),
        )?;

        let (widths, dropped) = srcset_widths(cover.width, breakpoints);
        let mut entries = Vec::with_capacity(widths.len() + 1);
        for width in widths {
            let dims = resolve_dimensions((cover.width, cover.height), Target::Width(width));
            let url = self.url_for(&checked, base, dims)?;
            entries.push(format!("{url} {width}w"));
        }
        if dropped {
            entries.push(format!("{src} {}w", cover.width));
        }
        debug!(
            graph = checked.graph,
            entries = entries.len(),
            fallback = dropped,
            "generated srcset"
        );

        Ok(Srcset {
            src,
            srcset: entries.join(", "),
        })
    }

    fn url_for(
        &self,
        checked: &Checked<'_, B::Config>,
        base: &Params,
        dims: Dimensions,
    ) -> Result<String, BackendError> {
        let params = crop_params(base, checked.cover.src, dims);
        self.builder.build_url(checked.config, checked.graph, &params)
    }

    fn media_block(
        &self,
        checked: &Checked<'_, B::Config>,
        base: &Params,
        query: &MediaQuery,
    ) -> Result<String, BackendError> {
        let cover = checked.cover;
        let dims = resolve_dimensions((cover.width, cover.height), query.target);
        let url = self.url_for(checked, base, dims)?;
        Ok(format!(
            "@media {} {{\n  {} {{\n    background-image: url('{}');\n  }}\n}}",
            query.query, query.selector, url
        ))
    }
}
