//! Bulk lead search: filter, score, enrich, merge, persist, stream.
//!
//! [`Orchestrator::run`] pages through the listing source, keeps the
//! candidates that pass the [`FilterCriteria`](leadscan_core::FilterCriteria),
//! enriches them three at a time and upserts each finished
//! [`LeadRecord`](leadscan_core::LeadRecord) into a
//! [`LeadStore`](leadscan_core::LeadStore). Progress can be streamed as
//! [`SearchEvent`]s over a channel.

pub mod error;
pub mod events;
pub mod filter;
pub mod memory_store;
pub mod merge;
pub mod orchestrator;
pub mod scorer;

pub use error::PipelineError;
pub use events::{next_with_keepalive, Progress, SearchEvent};
pub use filter::{first_failure, passes, FilterCheck};
pub use memory_store::MemoryLeadStore;
pub use merge::{dedup_issues, heuristic_record, merge, placeholder_website, RunContext, MAX_ISSUES};
pub use orchestrator::{
    BatchOutcome, BulkSearchOutcome, BulkSearchRequest, CandidateFailure, Orchestrator, RunStatus,
    ENRICH_CONCURRENCY, MAX_TARGET_COUNT,
};
pub use scorer::{initial_score, lead_strength};
