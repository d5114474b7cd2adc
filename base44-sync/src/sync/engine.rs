//! Sync orchestration: fetch, normalize, extract links, upsert

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::api::{DestinationStore, SourceProvider};
use crate::config::{EntityMapping, SyncCatalog};

use super::links::{extract_links, LinkRecord, LINK_CONFLICT_KEY};
use super::normalize::normalize_record;
use super::report::{RelationOutcome, SyncRun};

/// Drives one full mirror pass over the catalog
///
/// Relations run strictly sequentially in mapping order: a relation's
/// upsert must land before the next relation starts, since later relations
/// may reference ids written by earlier ones. A relation that fails is
/// recorded and the run moves on; nothing aborts the whole pass.
pub struct SyncEngine {
    provider: Arc<dyn SourceProvider>,
    store: Arc<dyn DestinationStore>,
    catalog: SyncCatalog,
    dry_run: bool,
}

impl SyncEngine {
    pub fn new(
        provider: Arc<dyn SourceProvider>,
        store: Arc<dyn DestinationStore>,
        catalog: SyncCatalog,
    ) -> Self {
        SyncEngine {
            provider,
            store,
            catalog,
            dry_run: false,
        }
    }

    /// Fetch and normalize everything but skip destination writes
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub async fn run(&self) -> SyncRun {
        let mut run = SyncRun::default();

        for mapping in &self.catalog.mappings {
            log::info!("syncing {} -> {}", mapping.source_entity, mapping.relation);

            match self.sync_relation(mapping).await {
                Ok((records, links)) => {
                    log::info!(
                        "{}: {} records, {} links",
                        mapping.relation,
                        records,
                        links
                    );
                    run.push(RelationOutcome::synced(&mapping.relation, records, links));
                }
                Err(err) => {
                    log::warn!("{}: {:#}", mapping.relation, err);
                    run.push(RelationOutcome::failed(&mapping.relation, format!("{:#}", err)));
                }
            }
        }

        run
    }

    /// One relation end to end; returns (records upserted, links upserted)
    async fn sync_relation(&self, mapping: &EntityMapping) -> Result<(usize, usize)> {
        let response = self.provider.fetch_entity(&mapping.source_entity).await?;
        let Some(batch) = response.into_batch() else {
            // Not-found is a skip, reported as a zero-count success
            return Ok((0, 0));
        };

        let normalized = self.normalize_batch(&mapping.relation, &batch);
        if normalized.is_empty() {
            return Ok((0, 0));
        }

        if !self.dry_run {
            self.store.upsert(&mapping.relation, "id", &normalized).await?;
        }

        let mut link_count = 0;
        if let Some(spec) = self.catalog.link_spec_for(&mapping.relation) {
            let links = extract_links(&normalized, spec);
            link_count = links.len();
            if !links.is_empty() && !self.dry_run {
                let rows: Vec<Value> = links.iter().map(LinkRecord::to_row).collect();
                self.store
                    .upsert(&spec.join_relation, LINK_CONFLICT_KEY, &rows)
                    .await?;
            }
        }

        Ok((normalized.len(), link_count))
    }

    fn normalize_batch(&self, relation: &str, batch: &[Value]) -> Vec<Value> {
        match self.catalog.rule_sets.get(relation) {
            Some(rules) => batch
                .iter()
                .filter_map(|record| normalize_record(record, rules))
                .collect(),
            // No rule set registered: pass through unmodified
            None => batch.to_vec(),
        }
    }
}
