//! Bulk put and delete.
//!
//! Both operations apply their entries sequentially in input order, one
//! backend call per entry. There is no rollback: a failure mid-sequence
//! leaves earlier entries applied, and the whole batch reports the failure.

use crate::api::utils::{json_response, HandlerBody};
use crate::envelope::Envelope;
use crate::errors::GatewayError;
use http::StatusCode;
use hyper::Response;
use hyper::body::Bytes;
use serde_json::Value;
use std::sync::Arc;
use store::KvStore;

/// Body: JSON array of records with `key` and `value` fields. Non-string
/// fields are coerced to their JSON text. Records may carry `expiration` or
/// `expiration_ttl` fields; they are accepted and ignored.
pub async fn bulk_put(
    store: Arc<dyn KvStore>,
    body: Bytes,
) -> Result<Response<HandlerBody>, GatewayError> {
    let entries = parse_array(&body)?;

    for entry in &entries {
        let key = coerce_string(entry.get("key").unwrap_or(&Value::Null));
        let value = coerce_string(entry.get("value").unwrap_or(&Value::Null));
        store.put(&key, value).await?;
    }

    json_response(StatusCode::OK, &Envelope::ok())
}

/// Body: JSON array of key strings.
pub async fn bulk_delete(
    store: Arc<dyn KvStore>,
    body: Bytes,
) -> Result<Response<HandlerBody>, GatewayError> {
    let keys = parse_array(&body)?;

    for key in &keys {
        store.delete(&coerce_string(key)).await?;
    }

    json_response(StatusCode::OK, &Envelope::ok())
}

fn parse_array(body: &Bytes) -> Result<Vec<Value>, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::Internal(format!("failed to parse bulk body: {e}")))
}

/// Coerce a JSON value to a string the way the provider does: strings pass
/// through, everything else becomes its JSON text.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;
    use store::memory::MemoryStore;

    fn test_store() -> Arc<dyn KvStore> {
        Arc::new(MemoryStore::new())
    }

    async fn body_string(response: Response<HandlerBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn bytes_of(value: serde_json::Value) -> Bytes {
        Bytes::from(serde_json::to_vec(&value).unwrap())
    }

    #[tokio::test]
    async fn bulk_put_stores_all_entries_in_order() {
        let store = test_store();
        let body = bytes_of(json!([
            {"key": "k1", "value": "v1"},
            {"key": "k2", "value": "v2"},
            {"key": "k1", "value": "v1-final"}
        ]));

        let response = bulk_put(store.clone(), body).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"success":true,"result":null}"#
        );

        assert_eq!(store.get("k1").await.unwrap(), Some("v1-final".to_string()));
        assert_eq!(store.get("k2").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn bulk_put_coerces_non_string_fields() {
        let store = test_store();
        let body = bytes_of(json!([
            {"key": 42, "value": 7},
            {"key": "flag", "value": true}
        ]));

        bulk_put(store.clone(), body).await.unwrap();

        assert_eq!(store.get("42").await.unwrap(), Some("7".to_string()));
        assert_eq!(store.get("flag").await.unwrap(), Some("true".to_string()));
    }

    #[tokio::test]
    async fn bulk_put_accepts_expiration_fields() {
        let store = test_store();
        let body = bytes_of(json!([
            {"key": "k", "value": "v", "expiration": 1999999999},
            {"key": "k2", "value": "v2", "expiration_ttl": 3600}
        ]));

        let response = bulk_put(store.clone(), body).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn bulk_delete_removes_all_keys() {
        let store = test_store();
        for key in ["a", "b", "c"] {
            store.put(key, "v".to_string()).await.unwrap();
        }

        let response = bulk_delete(store.clone(), bytes_of(json!(["a", "c", "never-stored"])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.get("c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unparseable_body_is_internal_error() {
        let err = bulk_put(test_store(), Bytes::from_static(b"not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));

        let err = bulk_delete(test_store(), Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
    }
}
