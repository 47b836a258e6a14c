//! Request routing.
//!
//! Routing is a pure function from `(method, path)` to a [`RouteMatch`]:
//! pattern matching yields structured parameters, and namespace resolution
//! happens afterwards as a separate step. Nothing here touches the request
//! body or any shared state.
//!
//! All routes share the provider's path shape
//! `{prefix}/accounts/{account}/storage/kv/namespaces/{namespace}/...` where
//! `{prefix}` is one or more opaque segments (clients commonly send
//! `/client/v4`) and `{account}` is a single opaque segment. Neither is
//! validated.

use hyper::Method;

/// Outcome of matching a request against the route table.
///
/// The fallback variants (`MissingKey`, `MethodNotAllowed`, `NotFound`)
/// carry no namespace: those routes answer before namespace resolution runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMatch {
    GetValue { namespace: String, key: String },
    PutValue { namespace: String, key: String },
    DeleteValue { namespace: String, key: String },
    BulkPut { namespace: String },
    BulkDelete { namespace: String },
    ListKeys { namespace: String },
    /// A values route with an empty key segment, any method.
    MissingKey,
    /// A values route with an unsupported method.
    MethodNotAllowed,
    /// No route pattern matched.
    NotFound,
}

/// Match a request against the fixed route table.
///
/// The `key` parameter is returned raw (still percent-encoded); decoding is
/// the value handlers' job.
pub fn match_route(method: &Method, path: &str) -> RouteMatch {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let Some((namespace, rest)) = split_namespace(&segments) else {
        return RouteMatch::NotFound;
    };

    match rest {
        ["values", key] => value_route(method, namespace, key),
        ["values"] => RouteMatch::MissingKey,
        ["bulk"] if *method == Method::PUT => RouteMatch::BulkPut { namespace },
        ["bulk"] if *method == Method::DELETE => RouteMatch::BulkDelete { namespace },
        ["keys"] if *method == Method::GET => RouteMatch::ListKeys { namespace },
        _ => RouteMatch::NotFound,
    }
}

fn value_route(method: &Method, namespace: String, key: &str) -> RouteMatch {
    let key = key.to_string();
    if *method == Method::GET {
        RouteMatch::GetValue { namespace, key }
    } else if *method == Method::PUT {
        RouteMatch::PutValue { namespace, key }
    } else if *method == Method::DELETE {
        RouteMatch::DeleteValue { namespace, key }
    } else {
        RouteMatch::MethodNotAllowed
    }
}

/// Locate the `accounts/{account}/storage/kv/namespaces/{namespace}` frame
/// inside the path and return the namespace id plus the trailing segments.
///
/// The frame must be preceded by at least one prefix segment.
fn split_namespace<'a>(segments: &'a [&'a str]) -> Option<(String, &'a [&'a str])> {
    for anchor in 1..segments.len() {
        if segments[anchor] != "accounts" {
            continue;
        }
        let frame = segments.get(anchor..anchor + 6)?;
        if frame[2] == "storage" && frame[3] == "kv" && frame[4] == "namespaces" {
            return Some((frame[5].to_string(), &segments[anchor + 6..]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "/client/v4/accounts/acc-1/storage/kv/namespaces/ns1";

    fn route(method: Method, path: &str) -> RouteMatch {
        match_route(&method, path)
    }

    #[test]
    fn value_routes_by_method() {
        assert_eq!(
            route(Method::GET, &format!("{BASE}/values/my-key")),
            RouteMatch::GetValue {
                namespace: "ns1".into(),
                key: "my-key".into()
            }
        );
        assert_eq!(
            route(Method::PUT, &format!("{BASE}/values/my-key")),
            RouteMatch::PutValue {
                namespace: "ns1".into(),
                key: "my-key".into()
            }
        );
        assert_eq!(
            route(Method::DELETE, &format!("{BASE}/values/my-key")),
            RouteMatch::DeleteValue {
                namespace: "ns1".into(),
                key: "my-key".into()
            }
        );
    }

    #[test]
    fn unsupported_method_on_values() {
        assert_eq!(
            route(Method::PATCH, &format!("{BASE}/values/my-key")),
            RouteMatch::MethodNotAllowed
        );
        assert_eq!(
            route(Method::POST, &format!("{BASE}/values/my-key")),
            RouteMatch::MethodNotAllowed
        );
    }

    #[test]
    fn empty_key_segment() {
        assert_eq!(
            route(Method::PUT, &format!("{BASE}/values/")),
            RouteMatch::MissingKey
        );
        assert_eq!(
            route(Method::GET, &format!("{BASE}/values")),
            RouteMatch::MissingKey
        );
    }

    #[test]
    fn bulk_routes() {
        assert_eq!(
            route(Method::PUT, &format!("{BASE}/bulk")),
            RouteMatch::BulkPut {
                namespace: "ns1".into()
            }
        );
        assert_eq!(
            route(Method::DELETE, &format!("{BASE}/bulk")),
            RouteMatch::BulkDelete {
                namespace: "ns1".into()
            }
        );
        // No fallback row for bulk: other methods fall through to 404.
        assert_eq!(route(Method::GET, &format!("{BASE}/bulk")), RouteMatch::NotFound);
    }

    #[test]
    fn keys_route() {
        assert_eq!(
            route(Method::GET, &format!("{BASE}/keys")),
            RouteMatch::ListKeys {
                namespace: "ns1".into()
            }
        );
        assert_eq!(
            route(Method::PUT, &format!("{BASE}/keys")),
            RouteMatch::NotFound
        );
    }

    #[test]
    fn prefix_segments_are_opaque() {
        // Single-segment prefix.
        assert_eq!(
            route(
                Method::GET,
                "/v4/accounts/acc/storage/kv/namespaces/ns1/values/k"
            ),
            RouteMatch::GetValue {
                namespace: "ns1".into(),
                key: "k".into()
            }
        );
        // Multi-segment prefix.
        assert_eq!(
            route(
                Method::GET,
                "/some/long/prefix/accounts/acc/storage/kv/namespaces/ns1/keys"
            ),
            RouteMatch::ListKeys {
                namespace: "ns1".into()
            }
        );
    }

    #[test]
    fn prefix_is_required() {
        assert_eq!(
            route(Method::GET, "/accounts/acc/storage/kv/namespaces/ns1/keys"),
            RouteMatch::NotFound
        );
    }

    #[test]
    fn percent_encoded_key_is_returned_raw() {
        assert_eq!(
            route(Method::GET, &format!("{BASE}/values/a%2Fb%20c")),
            RouteMatch::GetValue {
                namespace: "ns1".into(),
                key: "a%2Fb%20c".into()
            }
        );
    }

    #[test]
    fn unknown_paths() {
        assert_eq!(route(Method::GET, "/"), RouteMatch::NotFound);
        assert_eq!(route(Method::GET, "/health"), RouteMatch::NotFound);
        assert_eq!(
            route(Method::GET, &format!("{BASE}/unknown")),
            RouteMatch::NotFound
        );
        // Keys with unencoded slashes span segments and match nothing.
        assert_eq!(
            route(Method::GET, &format!("{BASE}/values/a/b")),
            RouteMatch::NotFound
        );
        // Truncated frame.
        assert_eq!(
            route(Method::GET, "/v4/accounts/acc/storage/kv"),
            RouteMatch::NotFound
        );
    }
}
