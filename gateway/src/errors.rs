use http::StatusCode;
use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Errors that can occur while handling a gateway request.
///
/// `Display` carries the internal detail used for logging; the message and
/// status code surfaced to clients come from [`GatewayError::public_message`]
/// and [`GatewayError::status`], which follow the provider's documented
/// contract exactly.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The namespace registry cannot be built from the current configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The requested namespace id is not present in the registry.
    #[error("unknown namespace: {0}")]
    NamespaceNotFound(String),

    /// A values route was hit with an empty key segment.
    #[error("missing key segment")]
    MissingKey,

    /// A values route was hit with an unsupported method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// No route pattern matched the request path.
    #[error("no route matched")]
    RouteNotFound,

    /// Backend failure, body read failure, or a programming error.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NamespaceNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::MissingKey => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the error envelope. Configuration errors expose
    /// their detail so a broken mapping is diagnosable from the response;
    /// everything else maps to a fixed contract string.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Config(msg) => msg.clone(),
            GatewayError::NamespaceNotFound(_) => "Invalid namespace".to_string(),
            GatewayError::MissingKey => "Missing key".to_string(),
            GatewayError::MethodNotAllowed => "Method not allowed".to_string(),
            GatewayError::RouteNotFound => "Invalid path".to_string(),
            GatewayError::Internal(_) | GatewayError::Io(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<store::StoreError> for GatewayError {
    fn from(err: store::StoreError) -> Self {
        GatewayError::Internal(err.to_string())
    }
}
