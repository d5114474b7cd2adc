//! Record normalization against a FieldRuleSet

use serde_json::{Map, Value};

use super::rules::FieldRuleSet;

/// Normalize one source record for its destination relation
///
/// Steps run in a fixed order, each over the output of the previous:
/// drop, whitelist, whole-number coercion, empty-string-to-null, boolean
/// code decoding, text canonicalization. Returns `None` when a whitelist
/// leaves no surviving fields (the record is discarded, not an error).
///
/// Never fails: a value that does not coerce is left unchanged. The
/// operation is idempotent, so re-normalizing already-clean output is a
/// no-op.
pub fn normalize_record(record: &Value, rules: &FieldRuleSet) -> Option<Value> {
    let Some(obj) = record.as_object() else {
        // Non-object payloads pass through; the destination rejects them
        // with a schema error if they reach an upsert.
        return Some(record.clone());
    };

    let mut fields: Map<String, Value> = obj.clone();

    fields.retain(|name, _| !rules.drop.contains(name));

    if let Some(whitelist) = &rules.whitelist {
        fields.retain(|name, _| whitelist.contains(name));
        if fields.is_empty() {
            return None;
        }
    }

    for value in fields.values_mut() {
        if let Some(whole) = coerce_whole_number(value) {
            *value = Value::from(whole);
        }
    }

    for value in fields.values_mut() {
        if value.as_str() == Some("") {
            *value = Value::Null;
        }
    }

    for (name, codes) in &rules.boolean_fields {
        if let Some(value) = fields.get_mut(name) {
            if let Some(flag) = codes.decode(value) {
                *value = Value::Bool(flag);
            }
        }
    }

    for name in &rules.text_canonicalize_fields {
        if let Some(value) = fields.get_mut(name) {
            let canonical = match value.as_str() {
                Some(text) if !text.is_empty() => Some(canonicalize_text(text)),
                _ => None,
            };
            if let Some(canonical) = canonical {
                *value = Value::String(canonical);
            }
        }
    }

    Some(Value::Object(fields))
}

/// Extract the integer form of a string or float representing a whole number
///
/// `"26799.0"` and `26799.0` both yield `26799`; `"10.5"` and values that do
/// not parse as numbers yield `None`. Values that are already integers are
/// left alone so the coercion is a fixed point.
fn coerce_whole_number(value: &Value) -> Option<i64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) if !n.is_i64() && !n.is_u64() => n.as_f64()?,
        _ => return None,
    };

    if !parsed.is_finite() || parsed != parsed.trunc() {
        return None;
    }
    // Past 2^53 an f64 no longer represents the integer exactly
    if parsed.abs() >= 9_007_199_254_740_992.0 {
        return None;
    }

    Some(parsed as i64)
}

/// Lowercase and strip commas to match the destination's fixed enumerations
fn canonicalize_text(text: &str) -> String {
    text.to_lowercase().replace(',', "")
}
