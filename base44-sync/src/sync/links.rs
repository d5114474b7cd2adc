//! Flattening nested parent substructures into join-relation rows

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Label substituted when a nested element carries no usable name
pub const MISSING_LABEL: &str = "(sin nombre)";

/// Composite conflict key for link rows, matching [`LinkRecord::to_row`]
pub const LINK_CONFLICT_KEY: &str = "parent_id,child_id,item_label,link_type";

/// Where an id array lives inside a nested list element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPath {
    /// Direct field on the element, e.g. `witness_ids`
    Direct(String),
    /// One level deeper, e.g. `valuation_results.rental_witnesses_used`
    Nested { container: String, field: String },
}

impl IdPath {
    fn resolve<'a>(&self, element: &'a Value) -> Option<&'a Vec<Value>> {
        match self {
            IdPath::Direct(field) => element.get(field),
            IdPath::Nested { container, field } => {
                element.get(container).and_then(|c| c.get(field))
            }
        }
        .and_then(Value::as_array)
    }
}

/// One id-array location tagged with its link-type label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdLocation {
    pub path: IdPath,
    pub link_type: String,
}

impl IdLocation {
    pub fn direct(field: impl Into<String>, link_type: impl Into<String>) -> Self {
        IdLocation {
            path: IdPath::Direct(field.into()),
            link_type: link_type.into(),
        }
    }

    pub fn nested(
        container: impl Into<String>,
        field: impl Into<String>,
        link_type: impl Into<String>,
    ) -> Self {
        IdLocation {
            path: IdPath::Nested {
                container: container.into(),
                field: field.into(),
            },
            link_type: link_type.into(),
        }
    }
}

/// How to flatten one parent relation's nested list into a join relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Destination relation whose records carry the nested list
    pub parent_relation: String,
    /// Join relation receiving the flattened rows
    pub join_relation: String,
    /// Nested list field on the parent record
    pub list_field: String,
    /// Label field within each nested element
    pub label_field: String,
    /// Id-array locations, in emission order
    pub id_locations: Vec<IdLocation>,
}

/// One flattened join row
///
/// Parent and child ids stay as raw JSON values; Base44 ids are opaque
/// strings but nothing here depends on that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    pub parent_id: Value,
    pub child_id: Value,
    pub item_label: String,
    pub link_type: String,
}

impl LinkRecord {
    /// Row shape for the destination upsert
    pub fn to_row(&self) -> Value {
        json!({
            "parent_id": self.parent_id,
            "child_id": self.child_id,
            "item_label": self.item_label,
            "link_type": self.link_type,
        })
    }
}

/// Extract link records from a normalized parent batch
///
/// Emission order is parent, then element, then location, then array
/// position. Missing or non-list fields contribute zero links; they are
/// expected in older records and never an error.
pub fn extract_links(parents: &[Value], spec: &LinkSpec) -> Vec<LinkRecord> {
    let mut links = Vec::new();

    for parent in parents {
        let Some(parent_id) = parent.get("id") else {
            continue;
        };
        let Some(elements) = parent.get(&spec.list_field).and_then(Value::as_array) else {
            continue;
        };

        for element in elements {
            let label = element
                .get(&spec.label_field)
                .and_then(Value::as_str)
                .unwrap_or(MISSING_LABEL);

            for location in &spec.id_locations {
                let Some(ids) = location.path.resolve(element) else {
                    continue;
                };
                for child_id in ids {
                    links.push(LinkRecord {
                        parent_id: parent_id.clone(),
                        child_id: child_id.clone(),
                        item_label: label.to_string(),
                        link_type: location.link_type.clone(),
                    });
                }
            }
        }
    }

    links
}
