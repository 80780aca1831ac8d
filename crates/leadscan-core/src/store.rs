//! Persistence seam for finished leads.

use std::future::Future;

use thiserror::Error;

use crate::lead::LeadRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lead store backend error: {0}")]
    Backend(String),
}

/// An upsert-capable sink keyed by [`LeadRecord::external_id`].
///
/// Implementations must be last-write-wins: upserting a lead whose
/// `external_id` already exists replaces the stored record.
pub trait LeadStore: Send + Sync {
    /// Insert or replace `lead`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the backend rejects the write.
    fn upsert_lead(
        &self,
        lead: &LeadRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
