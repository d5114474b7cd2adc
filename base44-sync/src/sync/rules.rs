//! Per-relation normalization policy

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Two-entry code table mapping discrete source codes to booleans
///
/// Base44 stores Two-Options style fields as "1"/"2" codes, sometimes as
/// strings and sometimes as numbers depending on how the form was filled in.
/// Codes are compared by their textual form so both shapes match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanCodes {
    /// Code mapped to `true`
    pub true_code: String,
    /// Code mapped to `false`
    pub false_code: String,
}

impl BooleanCodes {
    pub fn new(true_code: impl Into<String>, false_code: impl Into<String>) -> Self {
        BooleanCodes {
            true_code: true_code.into(),
            false_code: false_code.into(),
        }
    }

    /// Decode a raw value against the code table
    ///
    /// Returns `None` for unmapped codes and non-scalar values; the caller
    /// leaves the field unchanged in that case.
    pub fn decode(&self, value: &Value) -> Option<bool> {
        let code = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        if code == self.true_code {
            Some(true)
        } else if code == self.false_code {
            Some(false)
        } else {
            None
        }
    }
}

/// Normalization policy for one destination relation
///
/// Whole-number coercion and empty-string-to-null are global rules and have
/// no per-relation switch here. A relation with no registered rule set is
/// passed through unmodified by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRuleSet {
    /// Fields removed unconditionally
    #[serde(default)]
    pub drop: HashSet<String>,
    /// If set, only these fields survive; a record left empty is discarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<HashSet<String>>,
    /// Fields decoded through a boolean code table
    #[serde(default)]
    pub boolean_fields: HashMap<String, BooleanCodes>,
    /// String fields lowercased and stripped of commas to match destination enums
    #[serde(default)]
    pub text_canonicalize_fields: Vec<String>,
}

impl FieldRuleSet {
    pub fn new() -> Self {
        FieldRuleSet::default()
    }

    /// Add fields to the unconditional drop set
    pub fn drop_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Restrict surviving fields to an explicit column list
    pub fn with_whitelist<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Register a boolean-coded field
    pub fn boolean_field(
        mut self,
        field: impl Into<String>,
        true_code: impl Into<String>,
        false_code: impl Into<String>,
    ) -> Self {
        self.boolean_fields
            .insert(field.into(), BooleanCodes::new(true_code, false_code));
        self
    }

    /// Register a field whose text is canonicalized for a destination enum
    pub fn canonicalize_text_field(mut self, field: impl Into<String>) -> Self {
        self.text_canonicalize_fields.push(field.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_codes_decode_string_and_number() {
        let codes = BooleanCodes::new("1", "2");
        assert_eq!(codes.decode(&json!("1")), Some(true));
        assert_eq!(codes.decode(&json!("2")), Some(false));
        assert_eq!(codes.decode(&json!(2)), Some(false));
        assert_eq!(codes.decode(&json!(1)), Some(true));
    }

    #[test]
    fn test_boolean_codes_unmapped_code() {
        let codes = BooleanCodes::new("1", "2");
        assert_eq!(codes.decode(&json!("3")), None);
        assert_eq!(codes.decode(&json!(null)), None);
        assert_eq!(codes.decode(&json!(true)), None);
    }

    #[test]
    fn test_builder() {
        let rules = FieldRuleSet::new()
            .drop_fields(["created_by", "app_id"])
            .boolean_field("visited", "1", "2")
            .canonicalize_text_field("property_type");

        assert!(rules.drop.contains("created_by"));
        assert!(rules.whitelist.is_none());
        assert_eq!(
            rules.boolean_fields.get("visited"),
            Some(&BooleanCodes::new("1", "2"))
        );
        assert_eq!(rules.text_canonicalize_fields, vec!["property_type"]);
    }
}
