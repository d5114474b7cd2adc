//! Credential loading and the static sync catalog

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sync::links::{IdLocation, LinkSpec};
use crate::sync::rules::FieldRuleSet;

/// Credentials for both collaborators, loaded from the environment
///
/// A `.env` file in the working directory is honored when present.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub b44_app_id: String,
    pub b44_api_key: String,
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Credentials {
            b44_app_id: require("B44_APP_ID")?,
            b44_api_key: require("B44_API_KEY")?,
            supabase_url: require("SUPABASE_URL")?,
            supabase_key: require("SUPABASE_KEY")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing environment variable {}", name))
}

/// One source-entity to destination-relation pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub source_entity: String,
    pub relation: String,
}

impl EntityMapping {
    pub fn new(source_entity: impl Into<String>, relation: impl Into<String>) -> Self {
        EntityMapping {
            source_entity: source_entity.into(),
            relation: relation.into(),
        }
    }
}

/// Everything the engine needs for one run: the ordered entity mappings,
/// per-relation rule sets and the link specifications.
///
/// Mapping order is load-bearing: parent relations must be upserted before
/// relations whose foreign keys reference them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncCatalog {
    pub mappings: Vec<EntityMapping>,
    pub rule_sets: HashMap<String, FieldRuleSet>,
    pub link_specs: Vec<LinkSpec>,
}

impl SyncCatalog {
    pub fn link_spec_for(&self, relation: &str) -> Option<&LinkSpec> {
        self.link_specs.iter().find(|s| s.parent_relation == relation)
    }

    /// Keep only the mappings whose destination relation is listed
    pub fn retain_relations(&mut self, relations: &[String]) {
        self.mappings
            .retain(|m| relations.iter().any(|r| r == &m.relation));
    }

    /// The valuation application's catalog, in FK dependency order
    pub fn default_catalog() -> Self {
        let mappings = vec![
            EntityMapping::new("CompanyProfile", "company_profile"),
            EntityMapping::new("CompanySettings", "company_settings"),
            EntityMapping::new("ReportTemplate", "report_templates"),
            EntityMapping::new("Technician", "technicians"),
            EntityMapping::new("Client", "clients"),
            EntityMapping::new("Report", "reports"),
            EntityMapping::new("WitnessGroup", "witness_groups"),
            EntityMapping::new("Witness", "witnesses"),
            EntityMapping::new("Incident", "incidents"),
            EntityMapping::new("Document", "documents"),
        ];

        // Base44 bookkeeping columns that do not exist in the SQL schema;
        // upserting them trips PGRST204 on every relation.
        let shared_drop = [
            "created_by",
            "updated_by",
            "organization_id",
            "app_id",
            "owner_id",
        ];

        let mut rule_sets: HashMap<String, FieldRuleSet> = mappings
            .iter()
            .map(|m| (m.relation.clone(), FieldRuleSet::new().drop_fields(shared_drop)))
            .collect();

        rule_sets.insert(
            "reports".into(),
            FieldRuleSet::new()
                .drop_fields(shared_drop)
                .boolean_field("visited", "1", "2")
                .boolean_field("occupied", "1", "2")
                .canonicalize_text_field("property_type"),
        );

        // Destination only has these columns for documents; legacy records
        // carry a grab bag of extra metadata fields.
        rule_sets.insert(
            "documents".into(),
            FieldRuleSet::new()
                .with_whitelist(["id", "name", "file_url", "report_id", "created_date"]),
        );

        let link_specs = vec![LinkSpec {
            parent_relation: "reports".into(),
            join_relation: "report_witnesses".into(),
            list_field: "valued_elements".into(),
            label_field: "item_name".into(),
            id_locations: vec![
                IdLocation::direct("witness_ids", "venta"),
                IdLocation::nested("valuation_results", "rental_witnesses_used", "alquiler"),
            ],
        }];

        SyncCatalog {
            mappings,
            rule_sets,
            link_specs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = SyncCatalog::default_catalog();
        let relations: Vec<&str> = catalog.mappings.iter().map(|m| m.relation.as_str()).collect();
        assert_eq!(
            relations,
            vec![
                "company_profile",
                "company_settings",
                "report_templates",
                "technicians",
                "clients",
                "reports",
                "witness_groups",
                "witnesses",
                "incidents",
                "documents",
            ]
        );
    }

    #[test]
    fn test_default_catalog_rules() {
        let catalog = SyncCatalog::default_catalog();

        // Every relation gets at least the shared drop set
        for mapping in &catalog.mappings {
            let rules = catalog.rule_sets.get(&mapping.relation).unwrap();
            if mapping.relation == "documents" {
                assert!(rules.whitelist.is_some());
            } else {
                assert!(rules.drop.contains("created_by"));
            }
        }

        let reports = catalog.rule_sets.get("reports").unwrap();
        assert!(reports.boolean_fields.contains_key("visited"));
        assert_eq!(reports.text_canonicalize_fields, vec!["property_type"]);
    }

    #[test]
    fn test_link_spec_lookup() {
        let catalog = SyncCatalog::default_catalog();
        let spec = catalog.link_spec_for("reports").unwrap();
        assert_eq!(spec.join_relation, "report_witnesses");
        assert!(catalog.link_spec_for("clients").is_none());
    }

    #[test]
    fn test_retain_relations() {
        let mut catalog = SyncCatalog::default_catalog();
        catalog.retain_relations(&["reports".to_string(), "witnesses".to_string()]);

        let relations: Vec<&str> = catalog.mappings.iter().map(|m| m.relation.as_str()).collect();
        assert_eq!(relations, vec!["reports", "witnesses"]);
    }
}
