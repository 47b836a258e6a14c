//! Namespace registry construction and lookup.
//!
//! The registry maps externally visible namespace ids to backend handles.
//! It is rebuilt from the raw configuration value on every validation pass
//! (startup and the top of each request), so there is no cached instance to
//! go stale: a binding disappearing mid-run degrades to a configuration
//! error on the next request instead of silently serving old handles.
//!
//! Construction is all-or-nothing. One entry whose binding cannot be
//! resolved invalidates the whole registry, because serving a partial
//! namespace set is worse than refusing all traffic.

use crate::errors::GatewayError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use store::{KvStore, StoreSet};

pub type NamespaceRegistry = HashMap<String, Arc<dyn KvStore>>;

/// Parse the raw namespace configuration and resolve every binding against
/// the available backends.
///
/// The raw value is a JSON array of `{"id": ..., "binding": ...}` objects.
/// Entries that are not objects carrying string `id` and `binding` fields
/// are skipped; duplicate ids are allowed and the last one wins.
pub fn build_registry(
    raw: Option<&str>,
    stores: &StoreSet,
) -> Result<NamespaceRegistry, GatewayError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return Err(GatewayError::Config(
                "namespaces configuration is required".to_string(),
            ));
        }
    };

    let parsed: Value = serde_json::from_str(raw).map_err(|err| {
        tracing::error!(error = %err, "namespaces configuration is not valid JSON");
        GatewayError::Config("namespaces configuration must be valid JSON".to_string())
    })?;

    let entries = match parsed.as_array() {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            return Err(GatewayError::Config(
                "namespaces configuration must contain at least one namespace".to_string(),
            ));
        }
    };

    let mut registry = NamespaceRegistry::new();
    for entry in entries {
        let (Some(id), Some(binding)) = (
            entry.get("id").and_then(Value::as_str),
            entry.get("binding").and_then(Value::as_str),
        ) else {
            continue;
        };
        if id.is_empty() || binding.is_empty() {
            continue;
        }

        match stores.get(binding) {
            Some(store) => {
                registry.insert(id.to_string(), store);
            }
            None => {
                return Err(GatewayError::Config(format!(
                    "KV binding '{binding}' not found for namespace '{id}'"
                )));
            }
        }
    }

    if registry.is_empty() {
        return Err(GatewayError::Config(
            "no valid namespace configurations found".to_string(),
        ));
    }

    Ok(registry)
}

/// Look up the backend handle for a namespace id.
pub fn resolve(
    registry: &NamespaceRegistry,
    namespace: &str,
) -> Result<Arc<dyn KvStore>, GatewayError> {
    registry
        .get(namespace)
        .cloned()
        .ok_or_else(|| GatewayError::NamespaceNotFound(namespace.to_string()))
}
