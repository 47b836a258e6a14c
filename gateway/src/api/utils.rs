use crate::envelope::Envelope;
use crate::errors::GatewayError;
use http::StatusCode;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::Response;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;

pub type HandlerBody = BoxBody<Bytes, GatewayError>;

pub fn full_body(bytes: impl Into<Bytes>) -> HandlerBody {
    Full::new(bytes.into()).map_err(|e| match e {}).boxed()
}

pub fn empty_body() -> HandlerBody {
    full_body(Bytes::new())
}

/// Builds a JSON envelope response with the given status.
pub fn json_response(
    status: StatusCode,
    envelope: &Envelope,
) -> Result<Response<HandlerBody>, GatewayError> {
    let bytes = serde_json::to_vec(envelope)
        .map_err(|e| GatewayError::Internal(format!("failed to serialize envelope: {e}")))?;

    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(full_body(bytes))
        .map_err(|e| GatewayError::Internal(format!("failed to build response: {e}")))
}

/// Collects a request body into bytes.
pub async fn collect_body<B>(body: B) -> Result<Bytes, GatewayError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| GatewayError::Internal(format!("failed to read request body: {e}")))
}

/// Decodes a percent-encoded key path segment.
///
/// Malformed sequences that do not decode to UTF-8 are an internal error,
/// mirroring the original contract where a decode failure escaped to the
/// generic 500 handler.
pub fn decode_key(raw: &str) -> Result<String, GatewayError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| GatewayError::Internal(format!("failed to decode key '{raw}': {e}")))
}

/// Reads a single query-string parameter.
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
