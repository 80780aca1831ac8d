use std::collections::HashMap;
use std::sync::Mutex;

use leadscan_core::{LeadRecord, LeadStore, StoreError};

/// In-process [`LeadStore`] keyed by external id. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: Mutex<HashMap<String, LeadRecord>>,
}

impl MemoryLeadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, external_id: &str) -> Option<LeadRecord> {
        self.leads
            .lock()
            .ok()
            .and_then(|leads| leads.get(external_id).cloned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.leads.lock().map_or(0, |leads| leads.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LeadStore for MemoryLeadStore {
    async fn upsert_lead(&self, lead: &LeadRecord) -> Result<(), StoreError> {
        let mut leads = self
            .leads
            .lock()
            .map_err(|e| StoreError::Backend(format!("memory store lock poisoned: {e}")))?;
        leads.insert(lead.external_id.clone(), lead.clone());
        Ok(())
    }
}
