//! Deep merge functionality for configuration documents.
//!
//! Implements field-by-field merging where override values win over base
//! values. Sequences are replaced entirely, with one exception: the skill
//! list under `agent_card.skills` merges by entry `id`, because skill order
//! matters for display but identity matters for override correctness.

use serde_json::Value;

/// Key path whose sequence entries merge by `id` instead of being replaced.
pub const SKILLS_PATH: &str = "agent_card.skills";

/// Deep merge two document values, with `overlay` taking precedence over `base`.
///
/// - Mappings are merged recursively: keys only in base are retained, keys
///   only in overlay are added, shared keys recurse
/// - The sequence at `agent_card.skills` merges by entry `id` (see
///   [`SKILLS_PATH`]): a matching id merges that entry field-by-field, a new
///   id appends, pre-existing order is preserved
/// - Every other sequence, scalar, and type mismatch: overlay replaces the
///   base branch wholesale (last-write-wins)
///
/// The merger is schema-agnostic; unknown keys pass through and validation
/// happens in a later stage.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    merge_at("", base, overlay)
}

/// Merge multiple values in order, with later values taking precedence.
///
/// Equivalent to folding `deep_merge` over the list.
pub fn deep_merge_all(base: Value, overlays: impl IntoIterator<Item = Value>) -> Value {
    overlays.into_iter().fold(base, deep_merge)
}

fn merge_at(path: &str, base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    merge_at(&child_path, base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (Value::Array(base_seq), Value::Array(overlay_seq)) if path == SKILLS_PATH => {
            merge_skills(base_seq, overlay_seq)
        }
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Merge two skill sequences by entry `id`.
///
/// Entries without a string `id` cannot be matched and are appended as-is;
/// the validator rejects them later.
fn merge_skills(base: Vec<Value>, overlay: Vec<Value>) -> Value {
    let mut merged = base;

    for entry in overlay {
        let id = entry.get("id").and_then(Value::as_str).map(str::to_owned);
        let existing = id.as_deref().and_then(|id| {
            merged
                .iter()
                .position(|e| e.get("id").and_then(Value::as_str) == Some(id))
        });

        match existing {
            Some(pos) => {
                let prior = std::mem::take(&mut merged[pos]);
                let child_path = format!("{SKILLS_PATH}[{pos}]");
                merged[pos] = merge_at(&child_path, prior, entry);
            }
            None => merged.push(entry),
        }
    }

    Value::Array(merged)
}
