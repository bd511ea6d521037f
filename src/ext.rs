//! Extension traits to access dispatch metadata on the [`hyper::Request`]
//! object inside route handlers.

use crate::types::{RequestMeta, RouteParams};
use hyper::Request;
use lazy_static::lazy_static;
use std::net::SocketAddr;

lazy_static! {
    static ref EMPTY_PARAMS: RouteParams = RouteParams::new();
}

/// Route-match accessors on [`hyper::Request`].
pub trait RequestExt {
    /// The decoded parameters of the most recent matching route. Empty when
    /// no route has matched yet.
    fn params(&self) -> &RouteParams;

    /// Shorthand for a single parameter of [`params`](RequestExt::params).
    fn param<N: Into<String>>(&self, name: N) -> Option<&String>;

    /// The original pattern string of the most recent matching route.
    fn route_path(&self) -> Option<&str>;

    /// The peer address stamped by the request service, when the request
    /// came in through one.
    fn remote_addr(&self) -> Option<SocketAddr>;
}

impl<B> RequestExt for Request<B> {
    fn params(&self) -> &RouteParams {
        self.extensions()
            .get::<RequestMeta>()
            .and_then(|meta| meta.route_params())
            .unwrap_or(&EMPTY_PARAMS)
    }

    fn param<N: Into<String>>(&self, name: N) -> Option<&String> {
        self.params().get(name)
    }

    fn route_path(&self) -> Option<&str> {
        self.extensions().get::<RequestMeta>().and_then(|meta| meta.route_path())
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions()
            .get::<RequestMeta>()
            .and_then(|meta| meta.remote_addr())
    }
}
