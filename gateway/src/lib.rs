//! Namespace-multiplexed KV gateway.
//!
//! Emulates the provider's REST management API for namespaced key-value
//! storage in front of local backends. Each request is handled in three
//! stages: the namespace registry is rebuilt and validated from raw
//! configuration, the router matches method and path into structured
//! parameters, and the matched operation runs against the resolved backend.
//! Every outcome, success or failure, leaves through the envelope layer.

pub mod api;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod http;
pub mod registry;
pub mod router;

use crate::api::keys::ListQuery;
use crate::api::utils::{collect_body, empty_body, json_response, HandlerBody};
use crate::envelope::Envelope;
use crate::errors::GatewayError;
use crate::registry::NamespaceRegistry;
use crate::router::RouteMatch;
use hyper::body::Incoming;
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use store::StoreSet;

/// Everything the gateway needs to serve requests: the raw namespace
/// configuration (validated on every request, never cached in parsed form)
/// and the backends available for binding.
pub struct GatewayState {
    raw_namespaces: Option<String>,
    stores: StoreSet,
}

impl GatewayState {
    pub fn new(raw_namespaces: Option<String>, stores: StoreSet) -> Self {
        Self {
            raw_namespaces,
            stores,
        }
    }
}

#[derive(Clone)]
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    pub fn new(state: GatewayState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Handle one request. Infallible at this boundary: every error is
    /// normalized into the envelope and status contract.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<HandlerBody>
    where
        B: hyper::body::Body + Send,
        B::Data: Send,
        B::Error: std::fmt::Display,
    {
        // Configuration check runs before routing, so even unroutable
        // requests surface a broken mapping diagnosably.
        let registry = match registry::build_registry(
            self.state.raw_namespaces.as_deref(),
            &self.state.stores,
        ) {
            Ok(registry) => registry,
            Err(err) => {
                tracing::error!(error = %err, "configuration check failed");
                return respond_or_500(json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &Envelope::from_startup_error(&err),
                ));
            }
        };

        let route = router::match_route(req.method(), req.uri().path());
        match self.dispatch(req, route, &registry).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    GatewayError::Internal(_) | GatewayError::Io(_) => {
                        tracing::error!(error = %err, "request failed unexpectedly");
                    }
                    _ => tracing::debug!(error = %err, "request rejected"),
                }
                respond_or_500(json_response(err.status(), &Envelope::from_error(&err)))
            }
        }
    }

    async fn dispatch<B>(
        &self,
        req: Request<B>,
        route: RouteMatch,
        registry: &NamespaceRegistry,
    ) -> Result<Response<HandlerBody>, GatewayError>
    where
        B: hyper::body::Body + Send,
        B::Data: Send,
        B::Error: std::fmt::Display,
    {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), route = ?route, "matched route");

        match route {
            RouteMatch::GetValue { namespace, key } => {
                let store = registry::resolve(registry, &namespace)?;
                api::values::get_value(store, &key).await
            }
            RouteMatch::PutValue { namespace, key } => {
                let store = registry::resolve(registry, &namespace)?;
                let body = collect_body(req.into_body()).await?;
                api::values::put_value(store, &key, body).await
            }
            RouteMatch::DeleteValue { namespace, key } => {
                let store = registry::resolve(registry, &namespace)?;
                api::values::delete_value(store, &key).await
            }
            RouteMatch::BulkPut { namespace } => {
                let store = registry::resolve(registry, &namespace)?;
                let body = collect_body(req.into_body()).await?;
                api::bulk::bulk_put(store, body).await
            }
            RouteMatch::BulkDelete { namespace } => {
                let store = registry::resolve(registry, &namespace)?;
                let body = collect_body(req.into_body()).await?;
                api::bulk::bulk_delete(store, body).await
            }
            RouteMatch::ListKeys { namespace } => {
                let store = registry::resolve(registry, &namespace)?;
                let query = ListQuery::from_query(req.uri().query());
                api::keys::list_keys(store, query).await
            }
            RouteMatch::MissingKey => Err(GatewayError::MissingKey),
            RouteMatch::MethodNotAllowed => Err(GatewayError::MethodNotAllowed),
            RouteMatch::NotFound => {
                tracing::warn!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "no route matched"
                );
                Err(GatewayError::RouteNotFound)
            }
        }
    }
}

/// Last-resort fallback: if even the error envelope cannot be rendered,
/// answer a bare 500 so the connection still gets a response.
fn respond_or_500(
    result: Result<Response<HandlerBody>, GatewayError>,
) -> Response<HandlerBody> {
    result.unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to render response");
        let mut response = Response::new(empty_body());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

pub struct GatewayService {
    gateway: Gateway,
}

impl GatewayService {
    pub fn new(state: GatewayState) -> Self {
        Self {
            gateway: Gateway::new(state),
        }
    }
}

impl Service<Request<Incoming>> for GatewayService {
    type Response = Response<HandlerBody>;
    type Error = GatewayError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let gateway = self.gateway.clone();
        Box::pin(async move { Ok(gateway.handle(req).await) })
    }
}

/// Validate configuration eagerly, then serve. A failed validation is
/// logged but does not abort: requests may still arrive and must receive a
/// diagnosable startup-error envelope instead of a dead socket.
pub async fn run(listener: &config::Listener, state: GatewayState) -> Result<(), GatewayError> {
    if let Err(err) = registry::build_registry(state.raw_namespaces.as_deref(), &state.stores) {
        tracing::error!(error = %err, "startup validation failed, serving configuration errors");
    }

    http::run_http_service(&listener.host, listener.port, GatewayService::new(state)).await
}
