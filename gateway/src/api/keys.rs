//! Prefix-filtered key listing.

use crate::api::utils::{json_response, query_param, HandlerBody};
use crate::envelope::Envelope;
use crate::errors::GatewayError;
use http::StatusCode;
use hyper::Response;
use serde_json::json;
use std::sync::Arc;
use store::KvStore;

const DEFAULT_LIMIT: usize = 1000;
const MAX_LIMIT: usize = 1000;

/// List parameters derived from the query string. A `cursor` parameter is
/// accepted but never consulted: the backend contract returns complete
/// result sets, so listing never paginates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub prefix: String,
    pub limit: usize,
}

impl ListQuery {
    pub fn from_query(query: Option<&str>) -> Self {
        let prefix = query_param(query, "prefix").unwrap_or_default();
        let limit = query_param(query, "limit")
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(|limit| limit.clamp(1, MAX_LIMIT as i64) as usize)
            .unwrap_or(DEFAULT_LIMIT);

        ListQuery { prefix, limit }
    }
}

pub async fn list_keys(
    store: Arc<dyn KvStore>,
    query: ListQuery,
) -> Result<Response<HandlerBody>, GatewayError> {
    let mut keys = store.list(&query.prefix).await?;
    keys.truncate(query.limit);

    let result: Vec<_> = keys.into_iter().map(|k| json!({"name": k.name})).collect();
    let count = result.len();

    json_response(StatusCode::OK, &Envelope::list(json!(result), count))
}
