//! Privacy consent collaborator.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::outage::Outage;

/// Object-safe boxed future used by [`ConsentService`].
pub type ConsentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Consent state for one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// Data source identifier (for example `calendar`).
    pub context_type: String,
    /// Whether the user allowed collection from this source.
    pub is_enabled: bool,
    /// Last change, as reported by the backend.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// External privacy consent store.
pub trait ConsentService {
    /// Returns every consent record for the current session.
    fn get_consent(&self) -> ConsentFuture<'_, Result<Vec<ConsentRecord>, String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory consent store.
pub struct MemoryConsentService {
    records: Rc<RefCell<Vec<ConsentRecord>>>,
    outage: Outage,
}

impl MemoryConsentService {
    /// Creates a store seeded with `records`.
    pub fn with_records(records: Vec<ConsentRecord>) -> Self {
        Self {
            records: Rc::new(RefCell::new(records)),
            outage: Outage::default(),
        }
    }

    /// Makes `get_consent` fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.outage.set(reason);
    }
}

impl ConsentService for MemoryConsentService {
    fn get_consent(&self) -> ConsentFuture<'_, Result<Vec<ConsentRecord>, String>> {
        Box::pin(async move {
            self.outage.check()?;
            Ok(self.records.borrow().clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn consent_records_parse_backend_shape() {
        let records: Vec<ConsentRecord> = serde_json::from_str(
            r#"[{"contextType":"calendar","isEnabled":true,"updatedAt":"2024-01-01"}]"#,
        )
        .expect("parse");
        let service = MemoryConsentService::with_records(records);
        let loaded = block_on(service.get_consent()).expect("load");
        assert!(loaded[0].is_enabled);
    }
}
