//! The provider's JSON response envelope.
//!
//! Every non-raw-value response is `{success, result|null, result_info?,
//! errors?}`. Optional fields are omitted entirely when unset rather than
//! serialized as null, matching the upstream API byte for byte.

use crate::errors::GatewayError;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize, Debug)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorEntry>>,
}

/// Pagination block attached to list responses. The gateway never paginates,
/// so `cursor` is always null and `list_complete` always true.
#[derive(Serialize, Debug)]
pub struct ResultInfo {
    pub cursor: Option<String>,
    pub count: usize,
    pub list_complete: bool,
}

#[derive(Serialize, Debug)]
pub struct ErrorEntry {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Envelope {
    /// `{success: true, result: null}` - the shape of every mutating success.
    pub fn ok() -> Self {
        Envelope {
            success: true,
            result: Some(Value::Null),
            result_info: None,
            errors: None,
        }
    }

    /// Successful list response with its pagination block.
    pub fn list(result: Value, count: usize) -> Self {
        Envelope {
            success: true,
            result: Some(result),
            result_info: Some(ResultInfo {
                cursor: None,
                count,
                list_complete: true,
            }),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            result: None,
            result_info: None,
            errors: Some(vec![ErrorEntry {
                message: message.into(),
                code: None,
            }]),
        }
    }

    pub fn error_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Envelope {
            success: false,
            result: None,
            result_info: None,
            errors: Some(vec![ErrorEntry {
                message: message.into(),
                code: Some(code.into()),
            }]),
        }
    }

    /// Envelope for a request-level failure.
    pub fn from_error(err: &GatewayError) -> Self {
        Envelope::error(err.public_message())
    }

    /// Envelope for a failed configuration check, carrying the diagnostic
    /// code the provider contract requires on that path.
    pub fn from_startup_error(err: &GatewayError) -> Self {
        match err {
            GatewayError::Config(_) => Envelope::error_with_code(
                format!("Configuration error: {}", err.public_message()),
                "STARTUP_CONFIG_ERROR",
            ),
            _ => Envelope::error_with_code("Internal configuration error", "STARTUP_ERROR"),
        }
    }
}
