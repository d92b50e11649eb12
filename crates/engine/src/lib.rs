//! Query boundary to a Recoll full-text index.
//!
//! Recoll owns index construction, ranking, and stemming; this crate only
//! drives an existing index through a connect/query/execute/fetch contract.
//! The shipped backend shells out to the `recollq` command-line front end
//! ([`recollq::RecollDb`]); consumers talk to the [`IndexEngine`] and
//! [`IndexQuery`] traits so tests can substitute a scripted engine.

mod error;
pub mod recollq;

pub use error::{EngineError, Result};

use std::path::Path;
use std::sync::Arc;

/// One raw match record as delivered by the engine, in engine ranking order.
///
/// `mtime` is the engine-native timestamp token: one marker byte followed by
/// decimal epoch seconds. It is carried verbatim; decoding it is the
/// presentation layer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocHit {
    pub filename: String,
    pub url: String,
    pub mimetype: String,
    pub fbytes: u64,
    pub mtime: String,
    /// Extracted abstract/snippet. Not every document type produces one.
    pub abstract_text: Option<String>,
}

/// Cursor over the hits of one executed query expression.
///
/// A query handle is obtained fresh per invocation and never reused.
pub trait IndexQuery: Send {
    /// Run the expression and return the engine-reported total match count.
    /// Positions the cursor at the first hit.
    fn execute(&mut self, expression: &str) -> Result<usize>;

    /// Deliver the next hit, or `None` once the engine is exhausted. The
    /// engine may exhaust before the total reported by [`execute`] is
    /// reached; callers must tolerate under-delivery.
    ///
    /// [`execute`]: IndexQuery::execute
    fn fetch_next(&mut self) -> Result<Option<RawDocHit>>;
}

/// A live handle to the document index.
pub trait IndexEngine: Send + Sync {
    /// Open a fresh query handle. Handles are not pooled.
    fn query(&self) -> Result<Box<dyn IndexQuery>>;
}

/// Process-lifetime connection state, established once at startup.
///
/// A failed connect is terminal for search capability: the connection is
/// never retried, and every search operation checks this state once before
/// touching the engine.
#[derive(Clone)]
pub enum IndexConnection {
    Connected(Arc<dyn IndexEngine>),
    Unavailable(String),
}

impl IndexConnection {
    /// Connect to the index behind `confdir`, degrading to
    /// [`IndexConnection::Unavailable`] instead of failing.
    pub fn establish(confdir: &Path) -> Self {
        match recollq::RecollDb::connect(confdir) {
            Ok(db) => IndexConnection::Connected(Arc::new(db)),
            Err(err) => IndexConnection::Unavailable(err.to_string()),
        }
    }

    pub fn engine(&self) -> Option<&Arc<dyn IndexEngine>> {
        match self {
            IndexConnection::Connected(engine) => Some(engine),
            IndexConnection::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, IndexConnection::Connected(_))
    }
}
