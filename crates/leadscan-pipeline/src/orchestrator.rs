//! Bulk search orchestration.
//!
//! One sequential pagination loop drives bounded enrichment bursts:
//!
//! ```text
//! fetch page -> filter (up to the remaining target) -> enrich x3 -> loop
//! ```
//!
//! Leads are accumulated in completion order. Once the target is reached the
//! enrichment stream is dropped, which cancels any in-flight candidates;
//! their results are never accumulated.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use leadscan_core::{Candidate, FilterCriteria, LeadRecord, LeadStore, StoreError};
use leadscan_enrich::Enricher;
use leadscan_listing::ListingClient;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::events::{Progress, SearchEvent};
use crate::filter::passes;
use crate::merge::{heuristic_record, merge, RunContext};

/// Upper bound on `target_count`.
pub const MAX_TARGET_COUNT: usize = 1000;

/// Candidates enriched concurrently.
pub const ENRICH_CONCURRENCY: usize = 3;

#[derive(Debug, Clone)]
pub struct BulkSearchRequest {
    pub industry: String,
    pub location: String,
    /// Leads to find, `1..=MAX_TARGET_COUNT`.
    pub target_count: usize,
    pub filters: FilterCriteria,
}

impl BulkSearchRequest {
    fn validate(&self) -> Result<(), PipelineError> {
        if self.industry.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "industry must not be blank".to_string(),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "location must not be blank".to_string(),
            ));
        }
        if !(1..=MAX_TARGET_COUNT).contains(&self.target_count) {
            return Err(PipelineError::InvalidRequest(format!(
                "target_count must be between 1 and {MAX_TARGET_COUNT}, got {}",
                self.target_count
            )));
        }
        Ok(())
    }

    fn query(&self) -> String {
        format!("{} {}", self.industry.trim(), self.location.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The target count was reached.
    Completed,
    /// The run ended for any other reason.
    Partial,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Partial => "partial",
        }
    }
}

/// A qualifying candidate that could not be turned into a stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    pub external_id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkSearchOutcome {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub total_found: usize,
    pub total_scanned: usize,
    pub pages_fetched: u32,
    /// Completion order, not discovery order.
    pub leads: Vec<LeadRecord>,
    pub failures: Vec<CandidateFailure>,
}

/// Result of enriching one batch of candidates.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub leads: Vec<LeadRecord>,
    pub failures: Vec<CandidateFailure>,
}

/// Runs bulk searches against injected listing, enrichment and store
/// collaborators. Each [`run`](Orchestrator::run) is independent.
pub struct Orchestrator<S> {
    listing: ListingClient,
    enricher: Enricher,
    store: S,
    max_scan: usize,
}

impl<S: LeadStore> Orchestrator<S> {
    /// `max_scan` caps the number of listings scanned per run.
    #[must_use]
    pub fn new(listing: ListingClient, enricher: Enricher, store: S, max_scan: usize) -> Self {
        Self {
            listing,
            enricher,
            store,
            max_scan: max_scan.max(1),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one bulk search to completion.
    ///
    /// Pagination stops when the target is reached, the scan ceiling is
    /// reached, the source has no further page, or a page fetch fails. Only
    /// the first of these yields [`RunStatus::Completed`].
    ///
    /// When `events` is attached, a `status` event precedes each page, a
    /// `lead` event follows each stored lead, and a final `complete` event
    /// closes the run. A closed receiver does not stop the run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidRequest`] if the request fails
    /// validation. No I/O happens in that case. Every later failure is
    /// absorbed into the outcome.
    pub async fn run(
        &self,
        request: &BulkSearchRequest,
        events: Option<&mpsc::Sender<SearchEvent>>,
    ) -> Result<BulkSearchOutcome, PipelineError> {
        request.validate()?;

        let run_id = Uuid::new_v4();
        let target = request.target_count;
        let query = request.query();
        let ctx = RunContext {
            run_id,
            industry: request.industry.trim(),
            now: Utc::now(),
        };

        tracing::info!(
            %run_id,
            query = %query,
            target,
            max_scan = self.max_scan,
            "starting bulk search"
        );

        let mut leads: Vec<LeadRecord> = Vec::new();
        let mut failures: Vec<CandidateFailure> = Vec::new();
        let mut scanned: usize = 0;
        let mut pages: u32 = 0;
        let mut page_token: Option<String> = None;

        while leads.len() < target && scanned < self.max_scan {
            pages += 1;
            emit(
                events,
                SearchEvent::Status {
                    run_id,
                    message: format!("Fetching page {pages}"),
                    page: pages,
                    scanned,
                    found: leads.len(),
                },
            )
            .await;

            let page = match self.listing.fetch_page(&query, page_token.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(%run_id, page = pages, error = %e, "listing page fetch failed");
                    emit(
                        events,
                        SearchEvent::Error {
                            message: format!("listing page {pages} failed: {e}"),
                        },
                    )
                    .await;
                    break;
                }
            };

            if page.raw_count == 0 {
                tracing::info!(%run_id, page = pages, "listing source exhausted");
                break;
            }

            scanned += page.raw_count;
            page_token = page.next_token;

            let remaining = target - leads.len();
            let batch: Vec<Candidate> = page
                .candidates
                .into_iter()
                .filter(|c| passes(c, &request.filters))
                .take(remaining)
                .collect();

            tracing::info!(
                %run_id,
                page = pages,
                scanned,
                qualifying = batch.len(),
                found = leads.len(),
                "page filtered"
            );

            let progress = Progress {
                found: leads.len(),
                target,
            };
            let outcome = self.enrich_batch(batch, progress, ctx, events).await;
            leads.extend(outcome.leads);
            failures.extend(outcome.failures);

            if page_token.is_none() {
                tracing::info!(%run_id, page = pages, "no further pages");
                break;
            }
            if scanned >= self.max_scan {
                tracing::warn!(%run_id, scanned, max_scan = self.max_scan, "scan ceiling reached");
            }
        }

        let status = if leads.len() >= target {
            RunStatus::Completed
        } else {
            RunStatus::Partial
        };

        tracing::info!(
            %run_id,
            status = status.as_str(),
            found = leads.len(),
            target,
            scanned,
            pages,
            failed = failures.len(),
            "bulk search finished"
        );

        emit(
            events,
            SearchEvent::Complete {
                run_id,
                status,
                total_found: leads.len(),
                total_scanned: scanned,
                pages_fetched: pages,
            },
        )
        .await;

        Ok(BulkSearchOutcome {
            run_id,
            status,
            total_found: leads.len(),
            total_scanned: scanned,
            pages_fetched: pages,
            leads,
            failures,
        })
    }

    /// Enriches, merges and stores `batch` with at most
    /// [`ENRICH_CONCURRENCY`] candidates in flight.
    ///
    /// Stops accepting results once `progress.found` plus the leads of this
    /// batch reaches `progress.target`; candidates still in flight at that
    /// point are cancelled and never appear in the outcome.
    pub async fn enrich_batch(
        &self,
        batch: Vec<Candidate>,
        progress: Progress,
        ctx: RunContext<'_>,
        events: Option<&mpsc::Sender<SearchEvent>>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let remaining = progress.target.saturating_sub(progress.found);
        if batch.is_empty() || remaining == 0 {
            return outcome;
        }

        let mut completions = stream::iter(batch)
            .map(|candidate| async move {
                let result = self.process_candidate(&candidate, ctx).await;
                (candidate, result)
            })
            .buffer_unordered(ENRICH_CONCURRENCY);

        while let Some((candidate, result)) = completions.next().await {
            match result {
                Ok(lead) => {
                    outcome.leads.push(lead.clone());
                    let found = progress.found + outcome.leads.len();
                    tracing::info!(
                        run_id = %ctx.run_id,
                        external_id = %lead.external_id,
                        name = %lead.company_name,
                        found,
                        target = progress.target,
                        "lead stored"
                    );
                    emit(
                        events,
                        SearchEvent::Lead {
                            data: Box::new(lead),
                            progress: Progress {
                                found,
                                target: progress.target,
                            },
                        },
                    )
                    .await;
                    if outcome.leads.len() >= remaining {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        run_id = %ctx.run_id,
                        external_id = %candidate.external_id,
                        error = %e,
                        "candidate could not be stored; skipping"
                    );
                    outcome.failures.push(CandidateFailure {
                        external_id: candidate.external_id,
                        name: candidate.name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome
    }

    async fn process_candidate(
        &self,
        candidate: &Candidate,
        ctx: RunContext<'_>,
    ) -> Result<LeadRecord, StoreError> {
        let ctx = RunContext {
            now: Utc::now(),
            ..ctx
        };
        let lead = if candidate.has_website() {
            let enrichment = self.enricher.enrich(candidate).await;
            merge(candidate, enrichment, ctx)
        } else {
            heuristic_record(candidate, ctx)
        };
        self.store.upsert_lead(&lead).await?;
        Ok(lead)
    }
}

async fn emit(events: Option<&mpsc::Sender<SearchEvent>>, event: SearchEvent) {
    if let Some(tx) = events {
        if tx.send(event).await.is_err() {
            tracing::debug!("event receiver dropped; continuing without streaming");
        }
    }
}
