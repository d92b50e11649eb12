//! MCP tools for Recoll search.
//!
//! The tool router is the operation catalog and the dispatch table in one:
//! each `#[tool]` method below is advertised with its schemars-derived
//! argument schema and invoked by name. Every failure mode degrades to a
//! textual result so the client always receives a well-formed response.

mod schemas;


use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use recoll_engine::{IndexConnection, IndexEngine, RawDocHit};

use crate::normalize::normalize_hit;
use crate::{content, query};
use schemas::{
    ContentRequest, DateSearchRequest, FiletypeSearchRequest, RecentFilesEnvelope,
    RecentFilesRequest, SearchEnvelope, SearchRequest,
};

/// Fixed text returned by every index-backed operation when the connection
/// was never established. Content retrieval is unaffected.
const DB_UNAVAILABLE: &str = "Error: Recoll database not available. Check configuration.";

/// Recoll MCP service.
#[derive(Clone)]
pub struct RecollService {
    /// Index connection, established once at startup and never retried.
    connection: Arc<IndexConnection>,
    /// Tool router
    tool_router: ToolRouter<Self>,
}

impl RecollService {
    pub fn new(connection: IndexConnection) -> Self {
        Self {
            connection: Arc::new(connection),
            tool_router: Self::tool_router(),
        }
    }

    /// Reject operation names absent from the catalog before any engine work.
    fn dispatch_precheck(&self, name: &str) -> Option<CallToolResult> {
        if self.tool_router.map.contains_key(name) {
            None
        } else {
            Some(CallToolResult::error(vec![Content::text(format!(
                "Unknown tool: {name}"
            ))]))
        }
    }
}

/// Outcome of one executed expression: the engine-reported total plus the
/// hits actually materialized.
struct SearchOutcome {
    total: usize,
    hits: Vec<RawDocHit>,
}

/// Run `expression` on a fresh query handle, fetching at most `max_results`
/// hits in engine order. Stops early if the engine exhausts before reaching
/// the reported total; under-delivery is not an error.
fn run_query(
    engine: &dyn IndexEngine,
    expression: &str,
    max_results: usize,
) -> recoll_engine::Result<SearchOutcome> {
    let mut query = engine.query()?;
    let total = query.execute(expression)?;

    let mut hits = Vec::new();
    while hits.len() < max_results.min(total) {
        match query.fetch_next()? {
            Some(hit) => hits.push(hit),
            None => break,
        }
    }

    Ok(SearchOutcome { total, hits })
}

fn envelope_result<T: Serialize>(envelope: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(envelope).unwrap_or_default(),
    )])
}

fn search_error(err: recoll_engine::EngineError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!(
        "Error executing search: {err}"
    ))])
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RecollService {
    /// Plain full-text search.
    #[tool(
        description = "Search the indexed filesystem using keywords or phrases. Supports Boolean queries (AND, OR, NOT), phrase searches (\"exact phrase\"), and wildcards. Results are ranked by relevance. Examples: 'todo yubikey' finds documents with both terms; 'blog OR post' finds either; '\"exact phrase\"' matches the phrase; 'python NOT django' excludes django."
    )]
    pub async fn search_filesystem(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let engine = match self.connection.engine() {
            Some(engine) => engine,
            None => return Ok(CallToolResult::error(vec![Content::text(DB_UNAVAILABLE)])),
        };

        let outcome = match run_query(engine.as_ref(), &request.query, request.max_results) {
            Ok(outcome) => outcome,
            Err(err) => return Ok(search_error(err)),
        };

        let results: Vec<_> = outcome
            .hits
            .iter()
            .map(|hit| normalize_hit(hit, request.include_preview))
            .collect();

        Ok(envelope_result(&SearchEnvelope {
            query: request.query,
            total_results: outcome.total,
            returned_results: results.len(),
            results,
        }))
    }

    /// Search constrained to a modification-date range.
    #[tool(
        description = "Search files filtered by modification date range. Useful for finding recent documents or documents from a specific time period. Dates use YYYY-MM-DD format; either bound may be omitted."
    )]
    pub async fn search_by_date(
        &self,
        Parameters(request): Parameters<DateSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let engine = match self.connection.engine() {
            Some(engine) => engine,
            None => return Ok(CallToolResult::error(vec![Content::text(DB_UNAVAILABLE)])),
        };

        let expression = query::with_date_range(
            &request.query,
            request.start_date.as_deref(),
            request.end_date.as_deref(),
        );

        let outcome = match run_query(engine.as_ref(), &expression, request.max_results) {
            Ok(outcome) => outcome,
            Err(err) => return Ok(search_error(err)),
        };

        let results: Vec<_> = outcome
            .hits
            .iter()
            .map(|hit| normalize_hit(hit, false))
            .collect();

        Ok(envelope_result(&SearchEnvelope {
            query: expression,
            total_results: outcome.total,
            returned_results: results.len(),
            results,
        }))
    }

    /// Search constrained to a file type.
    #[tool(
        description = "Search files filtered by file type/mimetype. Common types: 'pdf' or 'application/pdf' for PDF documents, 'text' or 'text/*' for text files, 'markdown' for Markdown, 'image' or 'image/*' for images."
    )]
    pub async fn search_by_filetype(
        &self,
        Parameters(request): Parameters<FiletypeSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let engine = match self.connection.engine() {
            Some(engine) => engine,
            None => return Ok(CallToolResult::error(vec![Content::text(DB_UNAVAILABLE)])),
        };

        let expression = query::with_filetype(&request.query, &request.filetype);

        let outcome = match run_query(engine.as_ref(), &expression, request.max_results) {
            Ok(outcome) => outcome,
            Err(err) => return Ok(search_error(err)),
        };

        let results: Vec<_> = outcome
            .hits
            .iter()
            .map(|hit| normalize_hit(hit, false))
            .collect();

        Ok(envelope_result(&SearchEnvelope {
            query: expression,
            total_results: outcome.total,
            returned_results: results.len(),
            results,
        }))
    }

    /// Read a document body from the filesystem. Works without the index.
    #[tool(
        description = "Retrieve the full content of a document by its file URL. Use this after a search to get the complete text of a specific document."
    )]
    pub async fn get_document_content(
        &self,
        Parameters(request): Parameters<ContentRequest>,
    ) -> Result<CallToolResult, McpError> {
        match content::read_document(&request.url) {
            Ok(envelope) => Ok(envelope_result(&envelope)),
            Err(err) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error reading file: {err}"
            ))])),
        }
    }

    /// List recently modified indexed files.
    #[tool(
        description = "List recently modified files in the index. Useful for seeing what's been recently updated."
    )]
    pub async fn list_recent_files(
        &self,
        Parameters(request): Parameters<RecentFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let engine = match self.connection.engine() {
            Some(engine) => engine,
            None => return Ok(CallToolResult::error(vec![Content::text(DB_UNAVAILABLE)])),
        };

        let expression = query::recent(request.days);

        let outcome = match run_query(engine.as_ref(), &expression, request.max_results) {
            Ok(outcome) => outcome,
            Err(err) => return Ok(search_error(err)),
        };

        let results: Vec<_> = outcome
            .hits
            .iter()
            .map(|hit| normalize_hit(hit, false))
            .collect();

        Ok(envelope_result(&RecentFilesEnvelope {
            days: request.days,
            query: expression,
            total_results: outcome.total,
            returned_results: results.len(),
            results,
        }))
    }
}

impl ServerHandler for RecollService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Recoll search provides full-text access to your indexed filesystem. Use 'search_filesystem' for keyword queries, 'search_by_date' and 'search_by_filetype' to narrow matches, 'list_recent_files' for fresh documents, and 'get_document_content' to read a result in full.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            ..Default::default()
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            // An unknown name is a user-visible result, not a protocol fault,
            // and must short-circuit before any engine work.
            if let Some(result) = self.dispatch_precheck(request.name.as_ref()) {
                return Ok(result);
            }
            let context = ToolCallContext::new(self, request, context);
            self.tool_router.call(context).await
        }
    }
}
