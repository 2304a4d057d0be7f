//! `edurepo-recon`: Institution name reconciliation and website discovery.
//!
//! Pure engine crate: normalizes and scores institution names, merges
//! website listings from several sources, and runs the discovery chain over
//! injected network seams ([`Prober`], [`SearchService`], [`InstitutionStore`]).
//! No HTTP client or CLI dependencies.

pub mod abbrev;
pub mod canonical;
pub mod config;
pub mod discovery;
pub mod error;
pub mod input;
pub mod lexicon;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod rate_limit;
pub mod reconcile;
pub mod similarity;
pub mod source;
pub mod url_filter;

pub use abbrev::Abbreviator;
pub use canonical::{CanonicalInstitution, Consolidator, InstitutionKind, Ownership};
pub use config::ReconConfig;
pub use discovery::{
    DiscoveryChain, DiscoveryMethod, DiscoveryReport, Prober, SearchError, SearchService,
    WebsiteCandidate,
};
pub use error::ReconError;
pub use lexicon::Lexicon;
pub use model::{
    CutoffRecord, ProgramRecord, RawNameRecord, ReconReport, TargetInstitution, WebsiteMap,
    WebsiteMatch,
};
pub use normalize::{clean_display_name, Normalizer};
pub use persist::{persist_matches, ImportReport, InstitutionStore, PersistReport};
pub use rate_limit::{Clock, ManualClock, RateLimiter, SystemClock};
pub use reconcile::{merge_website_maps, Reconciler};
pub use similarity::{MatchResult, Scorer};
pub use source::{SourceAdapter, StaticSource};
pub use url_filter::UrlFilter;
