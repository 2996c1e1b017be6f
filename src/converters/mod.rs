//! Converters for generating load-test scenarios from analyzed requests
//!
//! This module provides the converter trait and the Gatling implementation.

pub mod gatling;

pub use gatling::GatlingConverter;

use crate::models::RequestModel;
use crate::pending::PendingWork;
use crate::warnings::Warnings;
use std::path::Path;

/// Everything a converter needs besides the request itself
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Simulation name, also the bodies sub-directory
    pub simulation_name: &'a str,
    /// Root directory of request body files
    pub bodies_path: &'a Path,
    /// Indentation depth of the request blocks
    pub indent: usize,
    /// Tracker for body writes and file checks
    pub pending: &'a PendingWork,
    /// Sink for advisory messages
    pub warnings: &'a Warnings,
}

/// Trait for converting analyzed requests into scenario text
pub trait Converter {
    /// The output type of the conversion (usually String for script content)
    type Output;

    /// Convert a single request. Side effects such as body files are
    /// registered with the context's [`PendingWork`].
    ///
    /// # Panics
    ///
    /// Registering a side effect spawns a Tokio task, so a request with a
    /// body must be converted from within a Tokio runtime.
    fn convert_request(&self, request: &RequestModel, ctx: &RenderContext<'_>) -> Self::Output;

    /// Convert every request, in order. Same runtime requirement as
    /// [`Converter::convert_request`].
    fn convert_requests(&self, requests: &[RequestModel], ctx: &RenderContext<'_>)
    -> Self::Output;
}
