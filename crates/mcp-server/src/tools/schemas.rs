//! Tool argument schemas and response envelopes.
//!
//! Request structs are the advertised tool catalog: schemars derives the
//! JSON Schema served on `tools/list`, and serde defaults double as the
//! schema defaults, so an argument left out by the caller takes the
//! documented value during deserialization.

use serde::{Deserialize, Serialize};

use crate::normalize::DocumentHit;

fn default_max_results() -> usize {
    20
}

fn default_include_preview() -> bool {
    true
}

fn default_days() -> u32 {
    7
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text query in Recoll syntax, passed through verbatim.
    #[schemars(description = "Search query using Recoll syntax (keywords, Boolean operators, quoted phrases, wildcards)")]
    pub query: String,

    #[serde(default = "default_max_results")]
    #[schemars(description = "Maximum number of results to return")]
    pub max_results: usize,

    #[serde(default = "default_include_preview")]
    #[schemars(description = "Include content preview/abstract in results")]
    pub include_preview: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateSearchRequest {
    #[schemars(description = "Search query (keywords)")]
    pub query: String,

    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: Option<String>,

    #[schemars(description = "End date in YYYY-MM-DD format")]
    pub end_date: Option<String>,

    #[serde(default = "default_max_results")]
    #[schemars(description = "Maximum number of results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FiletypeSearchRequest {
    #[schemars(description = "Search query (keywords)")]
    pub query: String,

    #[schemars(description = "File type filter (e.g. 'pdf', 'markdown', 'text', 'image/*')")]
    pub filetype: String,

    #[serde(default = "default_max_results")]
    #[schemars(description = "Maximum number of results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ContentRequest {
    #[schemars(description = "File URL from search results (file:///path/to/file)")]
    pub url: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecentFilesRequest {
    #[serde(default = "default_days")]
    #[schemars(description = "Number of days back to search")]
    pub days: u32,

    #[serde(default = "default_max_results")]
    #[schemars(description = "Maximum number of results")]
    pub max_results: usize,
}

/// Search response. `results` keeps the engine's ranking order; this layer
/// never re-sorts.
#[derive(Debug, Serialize)]
pub struct SearchEnvelope {
    /// The expression actually executed, after filter translation.
    pub query: String,
    /// Engine-reported count for the full match set.
    pub total_results: usize,
    /// Count actually materialized; at most the requested maximum, and at
    /// most `total_results`.
    pub returned_results: usize,
    pub results: Vec<DocumentHit>,
}

#[derive(Debug, Serialize)]
pub struct RecentFilesEnvelope {
    pub days: u32,
    pub query: String,
    pub total_results: usize,
    pub returned_results: usize,
    pub results: Vec<DocumentHit>,
}
