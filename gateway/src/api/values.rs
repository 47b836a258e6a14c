//! Single-key value operations.
//!
//! Get is the one endpoint that does not speak the JSON envelope: it returns
//! the raw stored value with 200, or an empty body with 404 when the key is
//! absent, matching the provider's raw-value contract for that route.

use crate::api::utils::{decode_key, empty_body, full_body, json_response, HandlerBody};
use crate::envelope::Envelope;
use crate::errors::GatewayError;
use http::StatusCode;
use hyper::Response;
use hyper::body::Bytes;
use std::sync::Arc;
use store::KvStore;

pub async fn get_value(
    store: Arc<dyn KvStore>,
    raw_key: &str,
) -> Result<Response<HandlerBody>, GatewayError> {
    let key = decode_key(raw_key)?;

    match store.get(&key).await? {
        Some(value) => Response::builder()
            .status(StatusCode::OK)
            .body(full_body(value))
            .map_err(|e| GatewayError::Internal(format!("failed to build response: {e}"))),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(empty_body())
            .map_err(|e| GatewayError::Internal(format!("failed to build response: {e}"))),
    }
}

/// Stores the request body verbatim as the value. No size or shape
/// validation happens here; that is the backend's concern.
pub async fn put_value(
    store: Arc<dyn KvStore>,
    raw_key: &str,
    body: Bytes,
) -> Result<Response<HandlerBody>, GatewayError> {
    let key = decode_key(raw_key)?;
    let value = String::from_utf8_lossy(&body).into_owned();

    store.put(&key, value).await?;
    json_response(StatusCode::OK, &Envelope::ok())
}

/// Deletes a key. Deleting an absent key succeeds the same way.
pub async fn delete_value(
    store: Arc<dyn KvStore>,
    raw_key: &str,
) -> Result<Response<HandlerBody>, GatewayError> {
    let key = decode_key(raw_key)?;

    store.delete(&key).await?;
    json_response(StatusCode::OK, &Envelope::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use store::memory::MemoryStore;

    fn test_store() -> Arc<dyn KvStore> {
        Arc::new(MemoryStore::new())
    }

    async fn body_string(response: Response<HandlerBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn put_then_get_returns_raw_value() {
        let store = test_store();

        let response = put_value(store.clone(), "k1", Bytes::from_static(b"v1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"success":true,"result":null}"#
        );

        let response = get_value(store, "k1").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "v1");
    }

    #[tokio::test]
    async fn get_miss_is_bare_404() {
        let response = get_value(test_store(), "missing").await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn encoded_keys_address_the_same_entry() {
        let store = test_store();

        put_value(store.clone(), "a%2Fb", Bytes::from_static(b"slash"))
            .await
            .unwrap();

        let response = get_value(store.clone(), "a%2Fb").await.unwrap();
        assert_eq!(body_string(response).await, "slash");
        assert_eq!(store.get("a/b").await.unwrap(), Some("slash".to_string()));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = test_store();
        put_value(store.clone(), "k", Bytes::from_static(b"v"))
            .await
            .unwrap();

        for _ in 0..2 {
            let response = delete_value(store.clone(), "k").await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_string(response).await,
                r#"{"success":true,"result":null}"#
            );
        }

        let response = get_value(store, "k").await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
