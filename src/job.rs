//! JSON job files.
//!
//! A job is one serialized call to a [`Rig`] entry point, tagged by `kind`:
//!
//! ```json
//! [
//!   { "kind": "breakpoints",
//!     "block": { "cover": { "src": "https://cdn/x.jpg", "width": 2000, "height": 1000 } },
//!     "property": "width", "selector": ".hero", "breakpoints": [480, 1024] },
//!   { "kind": "srcset",
//!     "block": { "cover": { "src": "https://cdn/x.jpg", "width": 2000, "height": 1000 } },
//!     "params": { "quality": 80 } }
//! ]
//! ```
//!
//! A file holds either one job object or an array of them. Fields a job
//! leaves out can be filled from [`DefaultsConfig`] with
//! [`Job::fill_defaults`] before running; values present in the job are
//! never overwritten, and absent blocks stay absent so validation still
//! reports them.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{DefaultsConfig, RigConfig};
use crate::imaging::{GraphServer, UrlBuilder, merge_params};
use crate::rig::{BreakpointOptions, MediaOptions, Rig, RigError, Source, SrcsetOptions};
use crate::types::Srcset;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A job object that does not match its `kind`.
    #[error("{location}: {source}")]
    Invalid {
        location: String,
        source: serde_json::Error,
    },
}

/// One call to a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job<C> {
    /// Explicit query items → CSS.
    Media(MediaOptions<C>),
    /// Breakpoint ranges → CSS.
    Breakpoints(BreakpointOptions<C>),
    /// Breakpoint widths → `{src, srcset}`.
    Srcset(SrcsetOptions<C>),
}

/// Result of a single job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobOutput {
    Css(String),
    Srcset(Srcset),
}

impl<C> Job<C> {
    pub fn kind(&self) -> &'static str {
        match self {
            Job::Media(_) => "media",
            Job::Breakpoints(_) => "breakpoints",
            Job::Srcset(_) => "srcset",
        }
    }

    pub fn source(&self) -> &Source<C> {
        match self {
            Job::Media(o) => &o.source,
            Job::Breakpoints(o) => &o.source,
            Job::Srcset(o) => &o.source,
        }
    }

    /// Cover src for display; empty when the job has none.
    pub fn label(&self) -> &str {
        self.source()
            .block
            .as_ref()
            .and_then(|b| b.cover.as_ref())
            .and_then(|c| c.src.as_deref())
            .unwrap_or("")
    }

    fn source_mut(&mut self) -> &mut Source<C> {
        match self {
            Job::Media(o) => &mut o.source,
            Job::Breakpoints(o) => &mut o.source,
            Job::Srcset(o) => &mut o.source,
        }
    }
}

impl Job<GraphServer> {
    /// Fill absent fields from config. Present fields are left alone; job
    /// params override default params key by key.
    pub fn fill_defaults(&mut self, config: &RigConfig) {
        let defaults: &DefaultsConfig = &config.defaults;
        let source = self.source_mut();
        if source.config.is_none() {
            source.config = Some(config.backend.clone());
        }
        if source.graph.is_none() {
            source.graph = Some(defaults.graph.clone());
        }
        source.params = merge_params(&defaults.params, &source.params);

        match self {
            Job::Media(_) => {}
            Job::Breakpoints(o) => {
                if o.property.is_none() {
                    o.property = Some(defaults.property.clone());
                }
                if o.selector.is_none() {
                    o.selector = Some(defaults.selector.clone());
                }
                if o.breakpoints.is_none() {
                    o.breakpoints = Some(defaults.breakpoints.clone());
                }
            }
            Job::Srcset(o) => {
                if o.breakpoints.is_none() {
                    o.breakpoints = Some(defaults.breakpoints.clone());
                }
            }
        }
    }
}

/// Parse a job file: one job object or an array of jobs.
pub fn parse_jobs<C>(json: &str) -> Result<Vec<Job<C>>, JobError>
where
    C: for<'de> Deserialize<'de>,
{
    let raw = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    raw.into_iter()
        .enumerate()
        .map(|(i, value)| {
            let unknown = unknown_keys(&value);
            if !unknown.is_empty() {
                warn!(job = i + 1, keys = ?unknown, "ignoring unknown job keys");
            }
            parse_job(i + 1, value)
        })
        .collect()
}

/// Keys common to every job kind.
const SOURCE_KEYS: &[&str] = &["kind", "block", "config", "graph", "params"];

/// Keys of a job object that its kind never reads.
pub fn unknown_keys(job: &Value) -> Vec<String> {
    let Value::Object(map) = job else {
        return Vec::new();
    };
    let own: &[&str] = match map.get("kind").and_then(Value::as_str) {
        Some("media") => &["items"],
        Some("breakpoints") => &["property", "selector", "breakpoints"],
        Some("srcset") => &["breakpoints"],
        _ => return Vec::new(),
    };
    map.keys()
        .filter(|k| !SOURCE_KEYS.contains(&k.as_str()) && !own.contains(&k.as_str()))
        .cloned()
        .collect()
}

fn parse_job<C>(number: usize, value: Value) -> Result<Job<C>, JobError>
where
    C: for<'de> Deserialize<'de>,
{
    match serde_json::from_value::<Job<C>>(value.clone()) {
        Ok(job) => Ok(job),
        Err(source) => {
            let location = match failing_field::<C>(&value) {
                Some(field) => format!("job {number}, field `{field}`"),
                None => format!("job {number}"),
            };
            Err(JobError::Invalid { location, source })
        }
    }
}

/// First field that fails to deserialize on its own next to `kind`.
///
/// Every field is optional, so a job holding only `kind` and one field
/// parses unless that field is malformed.
fn failing_field<C>(value: &Value) -> Option<String>
where
    C: for<'de> Deserialize<'de>,
{
    let map = value.as_object()?;
    let kind = map.get("kind")?;
    map.iter()
        .filter(|(key, _)| key.as_str() != "kind")
        .find(|(key, field)| {
            let mut single = serde_json::Map::new();
            single.insert("kind".to_string(), kind.clone());
            single.insert((*key).clone(), (*field).clone());
            serde_json::from_value::<Job<C>>(Value::Object(single)).is_err()
        })
        .map(|(key, _)| key.clone())
}

/// Read and parse a job file from disk.
pub fn load_jobs<C>(path: &Path) -> Result<Vec<Job<C>>, JobError>
where
    C: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let jobs = parse_jobs(&content)?;
    debug!(path = %path.display(), jobs = jobs.len(), "loaded job file");
    Ok(jobs)
}

/// Run one job through the matching entry point.
pub fn run_job<B: UrlBuilder>(rig: &Rig<B>, job: &Job<B::Config>) -> Result<JobOutput, RigError> {
    match job {
        Job::Media(o) => rig.generate(o).map(JobOutput::Css),
        Job::Breakpoints(o) => rig.breakpoints(o).map(JobOutput::Css),
        Job::Srcset(o) => rig.srcset(o).map(JobOutput::Srcset),
    }
}

/// Run jobs in parallel on the current rayon pool. Results keep input order;
/// one failing job does not stop the others.
pub fn run_batch<B>(rig: &Rig<B>, jobs: &[Job<B::Config>]) -> Vec<Result<JobOutput, RigError>>
where
    B: UrlBuilder,
    B::Config: Sync,
{
    let results: Vec<_> = jobs.par_iter().map(|job| run_job(rig, job)).collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(jobs = jobs.len(), failed, "batch finished");
    results
}
