//! The synchronization pipeline: normalization rules, link extraction and
//! the orchestrating engine.

pub mod engine;
pub mod links;
pub mod normalize;
pub mod report;
pub mod rules;

pub use engine::SyncEngine;
pub use links::{extract_links, IdLocation, IdPath, LinkRecord, LinkSpec};
pub use normalize::normalize_record;
pub use report::{RelationOutcome, RelationResult, SyncRun};
pub use rules::{BooleanCodes, FieldRuleSet};
