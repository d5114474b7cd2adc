//! Interfaces to the two external collaborators
//!
//! The engine only sees these traits, so tests substitute in-memory fakes
//! and the real clients stay thin HTTP wrappers.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// What a source fetch produced for one entity
///
/// Base44 answers with a JSON array for populated entities, a bare object
/// for singleton entities, and nothing useful for unknown or empty ones.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Records(Vec<Value>),
    Single(Value),
    NotFound,
}

impl FetchResponse {
    /// Normalize arity: a single record becomes a one-element batch,
    /// not-found becomes `None` (skip, not an error)
    pub fn into_batch(self) -> Option<Vec<Value>> {
        match self {
            FetchResponse::Records(records) => Some(records),
            FetchResponse::Single(record) => Some(vec![record]),
            FetchResponse::NotFound => None,
        }
    }
}

/// Read-only source of entity records
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Fetch all records of one entity. Not-found is a normal response;
    /// any other non-success is an error scoped to this entity.
    async fn fetch_entity(&self, entity: &str) -> Result<FetchResponse>;
}

/// Destination accepting idempotent batch upserts
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Insert-or-update `records` into `relation`, keyed by the columns in
    /// `conflict_key`. A batch either fully succeeds or errors.
    async fn upsert(&self, relation: &str, conflict_key: &str, records: &[Value]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_batch_arity() {
        let single = FetchResponse::Single(json!({"id": "1"}));
        assert_eq!(single.into_batch(), Some(vec![json!({"id": "1"})]));

        let records = FetchResponse::Records(vec![json!({"id": "1"}), json!({"id": "2"})]);
        assert_eq!(records.into_batch().map(|b| b.len()), Some(2));

        assert_eq!(FetchResponse::NotFound.into_batch(), None);
    }
}
