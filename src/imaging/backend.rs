//! URL backend trait and shared error type.
//!
//! The [`UrlBuilder`] trait is the one capability the generators need from
//! the image-transformation service: turn a config, a graph name and a param
//! map into a URL. The generators never look inside the config or the URL.
//!
//! The bundled implementation is
//! [`SignedUrlBuilder`](super::signed_backend::SignedUrlBuilder).

use crate::types::Params;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("invalid backend server: {0}")]
    InvalidServer(String),
    #[error("param '{0}' must be a string, number, boolean or null")]
    NonScalarParam(String),
    #[error("URL building failed: {0}")]
    Failed(String),
}

/// Builds transformation URLs for a backend.
///
/// `Sync` so one builder can serve a parallel batch of jobs.
pub trait UrlBuilder: Sync {
    /// Backend-specific connection settings, forwarded untouched.
    type Config;

    fn build_url(
        &self,
        config: &Self::Config,
        graph: &str,
        params: &Params,
    ) -> Result<String, BackendError>;
}

impl<T: UrlBuilder + ?Sized> UrlBuilder for &T {
    type Config = T::Config;

    fn build_url(
        &self,
        config: &Self::Config,
        graph: &str,
        params: &Params,
    ) -> Result<String, BackendError> {
        (**self).build_url(config, graph, params)
    }
}
