//! Per-run outcome reporting

use serde::Serialize;

/// Outcome of one relation within a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RelationResult {
    /// Upsert applied (or nothing to apply); counts of entity records and
    /// link rows written. A not-found or empty fetch reports zero counts.
    Synced { records: usize, links: usize },
    /// Fetch or upsert failed; the reason is captured, the run continued
    Failed { reason: String },
}

/// One relation's entry in the run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationOutcome {
    pub relation: String,
    #[serde(flatten)]
    pub result: RelationResult,
}

impl RelationOutcome {
    pub fn synced(relation: impl Into<String>, records: usize, links: usize) -> Self {
        RelationOutcome {
            relation: relation.into(),
            result: RelationResult::Synced { records, links },
        }
    }

    pub fn failed(relation: impl Into<String>, reason: impl Into<String>) -> Self {
        RelationOutcome {
            relation: relation.into(),
            result: RelationResult::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.result, RelationResult::Failed { .. })
    }
}

/// Ordered outcomes for one invocation, one entry per mapped relation
///
/// Transient: built during the run, printed, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncRun {
    pub outcomes: Vec<RelationOutcome>,
}

impl SyncRun {
    pub fn push(&mut self, outcome: RelationOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(RelationOutcome::is_failed)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Total entity records written across all successful relations
    pub fn total_records(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.result {
                RelationResult::Synced { records, .. } => records,
                RelationResult::Failed { .. } => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_totals() {
        let mut run = SyncRun::default();
        run.push(RelationOutcome::synced("clients", 12, 0));
        run.push(RelationOutcome::failed("reports", "boom"));
        run.push(RelationOutcome::synced("witnesses", 3, 0));

        assert!(run.has_failures());
        assert_eq!(run.failed_count(), 1);
        assert_eq!(run.total_records(), 15);
    }

    #[test]
    fn test_clean_run() {
        let mut run = SyncRun::default();
        run.push(RelationOutcome::synced("clients", 0, 0));

        assert!(!run.has_failures());
        assert_eq!(run.total_records(), 0);
    }
}
