//! Paginated client for the local-business search API.
//!
//! Fetches one page of listings per call and normalizes each entry into a
//! [`leadscan_core::Candidate`]. Pagination state is an opaque token handed
//! back to the caller; the client never loops on its own.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{ListingClient, ListingPage, ListingSettings};
pub use error::ListingError;
pub use normalize::normalize_business;
pub use types::{BusinessSearchResponse, RawBusiness};
