//! Webhook payload normalizer.
//!
//! Scrapers post leads in wildly different shapes: a single object, an array
//! of objects, or a map whose values are the records. Field names differ per
//! vendor as well (`nome_empresa` vs `name` vs `title`). This module maps any
//! decoded JSON value onto an ordered list of canonical [`NewLead`] records.
//!
//! The mapping is total: normalization never fails, and the worst case for a
//! malformed payload is a single record with placeholder fields. Dropping an
//! untrusted request would lose data; storing an under-populated record does
//! not, because `raw_data` always keeps the original payload.

use serde_json::{Map, Value};

use crate::leads::leads_model::{Environment, NewLead, DEFAULT_LEAD_NAME, ENVIRONMENT_KEY};

/// Source keys tried per canonical field, in priority order.
const NAME_KEYS: &[&str] = &["nome_empresa", "name", "title"];
const ADDRESS_KEYS: &[&str] = &["endereco", "address", "full_address"];
const PHONE_KEYS: &[&str] = &["telefone", "phone", "phone_number"];
const WEBSITE_KEYS: &[&str] = &["website", "site"];
const INSTAGRAM_KEYS: &[&str] = &["instagram", "ig"];
const IMAGE_URL_KEYS: &[&str] = &["image_url", "image", "photo", "thumbnail"];
const IDX_KEYS: &[&str] = &["idx", "id"];

/// Normalizes an arbitrary decoded JSON payload into canonical lead records,
/// tagging each record's `raw_data` with the given environment.
///
/// Always returns at least one record.
pub fn normalize(payload: &Value, env: Environment) -> Vec<NewLead> {
    candidates(payload)
        .into_iter()
        .map(|candidate| canonicalize(candidate, env))
        .collect()
}

/// Shape resolution: splits the payload into candidate record objects.
fn candidates(payload: &Value) -> Vec<Map<String, Value>> {
    match payload {
        Value::Array(items) => items.iter().map(as_candidate).collect(),
        Value::Object(obj) => {
            if NAME_KEYS.iter().any(|key| obj.contains_key(*key)) {
                // The payload itself looks like a single lead.
                return vec![obj.clone()];
            }
            // Map-of-records: each object-valued entry is one candidate.
            let nested: Vec<Map<String, Value>> = obj
                .values()
                .filter_map(|v| v.as_object().cloned())
                .collect();
            if nested.is_empty() {
                vec![obj.clone()]
            } else {
                nested
            }
        }
        other => vec![as_candidate(other)],
    }
}

/// Wraps non-object values so every candidate is an object; the original
/// value survives under a `raw` key.
fn as_candidate(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(obj) => obj.clone(),
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("raw".to_string(), other.clone());
            wrapped
        }
    }
}

fn canonicalize(candidate: Map<String, Value>, env: Environment) -> NewLead {
    let name = first_non_empty(&candidate, NAME_KEYS)
        .unwrap_or_else(|| DEFAULT_LEAD_NAME.to_string());
    let address = first_non_empty(&candidate, ADDRESS_KEYS).unwrap_or_default();
    let phone = first_non_empty(&candidate, PHONE_KEYS).unwrap_or_default();
    let website = first_non_empty(&candidate, WEBSITE_KEYS).unwrap_or_default();
    let instagram = first_non_empty(&candidate, INSTAGRAM_KEYS).unwrap_or_default();
    let image_url = first_non_empty(&candidate, IMAGE_URL_KEYS).unwrap_or_default();
    let rating = non_empty_value(&candidate, "rating");
    let reviews = non_empty_value(&candidate, "reviews");
    let especialidades = non_empty_value(&candidate, "especialidades");
    let idx = IDX_KEYS
        .iter()
        .find_map(|key| non_empty_value(&candidate, key));

    // Shallow copy of the original candidate plus the environment tag, so the
    // payload is never discarded even when the canonical fields miss a
    // vendor-specific format.
    let mut raw_data = candidate;
    raw_data.insert(
        ENVIRONMENT_KEY.to_string(),
        Value::String(env.as_str().to_string()),
    );

    NewLead {
        name,
        address,
        phone,
        website,
        instagram,
        image_url,
        rating,
        reviews,
        especialidades,
        idx,
        raw_data: Value::Object(raw_data),
    }
}

/// Returns the first key whose value is present and non-empty, rendered as a
/// string. Missing keys, `null`, and `""` are all treated as empty;
/// non-string scalars are stringified.
fn first_non_empty(candidate: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        candidate.get(*key).and_then(|value| match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
    })
}

/// Like [`first_non_empty`] but keeps the raw JSON value, for pass-through
/// fields whose type the store preserves.
fn non_empty_value(candidate: &Map<String, Value>, key: &str) -> Option<Value> {
    candidate.get(key).and_then(|value| match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other.clone()),
    })
}
