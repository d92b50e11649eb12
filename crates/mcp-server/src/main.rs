//! Recoll MCP Server
//!
//! Exposes a Recoll-indexed filesystem to AI agents via MCP.
//!
//! ## Tools
//!
//! - `search_filesystem` - Full-text search with Recoll query syntax
//! - `search_by_date` - Search constrained to a modification-date range
//! - `search_by_filetype` - Search constrained to a file type/mimetype
//! - `get_document_content` - Read the full text of a search result
//! - `list_recent_files` - List recently modified indexed files
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "recoll-search": {
//!       "command": "recoll-mcp"
//!     }
//!   }
//! }
//! ```
//!
//! The index configuration directory defaults to `~/.config/recoll` and can
//! be overridden with `RECOLL_CONFDIR`.

use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::path::PathBuf;

mod content;
mod normalize;
mod query;
mod tools;

use recoll_engine::IndexConnection;
use tools::RecollService;

fn recoll_confdir() -> PathBuf {
    std::env::var_os("RECOLL_CONFDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("recoll")
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let confdir = recoll_confdir();
    let connection = IndexConnection::establish(&confdir);
    if let IndexConnection::Unavailable(reason) = &connection {
        // Degraded mode: content retrieval still works, searches report the
        // missing connection.
        log::warn!("Could not connect to Recoll database: {reason}");
    }

    log::info!("Starting Recoll MCP server");

    let service = RecollService::new(connection);
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Recoll MCP server stopped");
    Ok(())
}
