use std::collections::HashMap;
use std::net::SocketAddr;

/// The decoded parameters of a matched route.
///
/// A parameter which was declared in the pattern but captured nothing (a
/// greedy parameter over an empty remainder) is absent here rather than
/// present with an empty value.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Creates an empty `RouteParams`.
    pub fn new() -> RouteParams {
        RouteParams(HashMap::new())
    }

    pub(crate) fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(HashMap::with_capacity(capacity))
    }

    pub(crate) fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the value of the provided parameter name, if it is present.
    pub fn get<N: Into<String>>(&self, name: N) -> Option<&String> {
        self.0.get(&name.into())
    }

    /// Checks whether the provided parameter is present.
    pub fn has<N: Into<String>>(&self, name: N) -> bool {
        self.0.contains_key(&name.into())
    }

    /// The number of present parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the present `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// Per-request metadata carried in the request's extensions: the most recent
/// route match plus the peer address stamped by the request service.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestMeta {
    route_params: Option<RouteParams>,
    route_path: Option<String>,
    remote_addr: Option<SocketAddr>,
}

impl RequestMeta {
    pub(crate) fn with_route(params: RouteParams, route_path: String) -> RequestMeta {
        RequestMeta {
            route_params: Some(params),
            route_path: Some(route_path),
            remote_addr: None,
        }
    }

    pub(crate) fn with_remote_addr(remote_addr: SocketAddr) -> RequestMeta {
        RequestMeta {
            route_params: None,
            route_path: None,
            remote_addr: Some(remote_addr),
        }
    }

    // A later matching route replaces the whole match, params and path
    // together; the remote address survives across matches.
    pub(crate) fn merge(&mut self, other: RequestMeta) {
        if other.route_params.is_some() {
            self.route_params = other.route_params;
            self.route_path = other.route_path;
        }
        if other.remote_addr.is_some() {
            self.remote_addr = other.remote_addr;
        }
    }

    pub(crate) fn route_params(&self) -> Option<&RouteParams> {
        self.route_params.as_ref()
    }

    pub(crate) fn route_path(&self) -> Option<&str> {
        self.route_path.as_deref()
    }

    pub(crate) fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}
