//! HTTP adapters for the reconciliation engine.
//!
//! Implements the engine's network seams with a blocking reqwest client:
//! website probing, web search, remote listings and the institutions API.
//!
//! No retries. Per-item failures are reported, never raised past the caller.

mod api;
mod listing;
mod probe;
mod search;

pub use api::{ApiError, InstitutionApi};
pub use listing::{PoliteFetcher, RemoteListingSource};
pub use probe::HttpProber;
pub use search::CustomSearchClient;
