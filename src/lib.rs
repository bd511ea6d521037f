//! `cascade` is a continuation-style route dispatcher for the Rust HTTP
//! library [hyper](https://hyper.rs/): declarative path patterns compile into
//! matchers, and routes compose into an ordered pipeline in which every route
//! may handle a request or explicitly hand it onwards.
//!
//! Core features:
//!
//! - 🧭 Path patterns with literal segments, named parameters (`:name`),
//!   greedy parameters (`:name+`) and wildcards (`*`), compiled once into
//!   anchored regexes
//!
//! - 🪜 Routes are middleware, not lookup-table entries: several routes for
//!   the same method and path run in registration order, as long as each
//!   handler forwards with its [`Next`] continuation
//!
//! - 🔎 Captured parameters are percent-decoded and exposed on the request
//!   via the [`RequestExt`](./ext/trait.RequestExt.html) extension trait
//!
//! - 🧱 Immutable after build: one `Arc<Router>` serves any number of
//!   concurrent requests without locking
//!
//! - ❗ A pluggable error handler turns dispatch errors into responses
//!
//! ## Basic example
//!
//! ```no_run
//! use cascade::prelude::*;
//! use cascade::{Router, RouterService};
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::service::Service;
//! use hyper::{Request, Response};
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! fn router() -> Router<Incoming> {
//!     Router::builder()
//!         .get("/", |_req, _next| async move {
//!             Ok(Response::new(Full::new(Bytes::from("Home page"))))
//!         })
//!         .get("/users/:userId", |req, _next| async move {
//!             let user_id = req.param("userId").cloned().unwrap_or_default();
//!             Ok(Response::new(Full::new(Bytes::from(format!("Hello {}", user_id)))))
//!         })
//!         .build()
//!         .unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let service = Arc::new(RouterService::new(router()));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = service.call(&stream).await.unwrap();
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Route patterns
//!
//! A pattern is matched against the whole request path. Consecutive slashes
//! in a pattern collapse to one and a single trailing slash is ignored, so
//! `/a//b/` registers the same route as `/a/b`.
//!
//! - `/about` matches exactly `/about` (and `/about/` unless the `trailing`
//!   option is off, `/ABOUT` unless `sensitive` is on).
//! - `/users/:id` captures one segment into the parameter `id`; a named
//!   parameter never crosses a `/`.
//! - `/docs/:path+` captures the whole remainder, slashes included, into
//!   `path`. When the remainder is empty the parameter is absent rather than
//!   an empty string.
//! - `/files/:name.:ext` captures extension-style segments; a dot-prefixed
//!   parameter excludes the dot itself.
//! - `/files/*` matches `/files` as well as `/files/anything/below`, without
//!   declaring a parameter.
//!
//! Captured values are percent-decoded before handlers see them:
//!
//! ```
//! use cascade::prelude::*;
//! use cascade::Router;
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::Response;
//!
//! # fn run() -> Router<Incoming> {
//! let router = Router::builder()
//!     .get("/package/:name", |req, _next| async move {
//!         let name = req.param("name").cloned().unwrap_or_default();
//!         Ok(Response::new(Full::new(Bytes::from(name))))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Routes stack
//!
//! Every handler receives the request and a [`Next`] continuation. Calling
//! [`Next::run`] hands control to the rest of the pipeline: the remaining
//! handlers of the same route, then later routes, then the surrounding
//! framework's fallback. Not calling it ends the dispatch with this handler's
//! response. This makes a plain route double as middleware:
//!
//! ```
//! use cascade::prelude::*;
//! use cascade::Router;
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::Response;
//!
//! # fn run() -> Router<Incoming> {
//! let router = Router::builder()
//!     // Runs first: logs the match, then forwards.
//!     .get("/users/:id", |req, next| async move {
//!         println!("matched {:?}", req.route_path());
//!         next.run(req).await
//!     })
//!     // Runs second: produces the response.
//!     .get("/users/:id", |req, _next| async move {
//!         let id = req.param("id").cloned().unwrap_or_default();
//!         Ok(Response::new(Full::new(Bytes::from(format!("user {}", id)))))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! A single route can also carry a whole handler chain, registered through
//! [`RouterBuilder::register`] with [`RouteHandler::new`]:
//!
//! ```
//! use cascade::{Next, RouteHandler, Router};
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::{Method, Request, Response};
//!
//! # fn run() -> Router<Incoming> {
//! let router = Router::builder()
//!     .register(
//!         Some(Method::GET),
//!         "/admin",
//!         vec![
//!             RouteHandler::new(|req: Request<Incoming>, next: Next<Incoming>| async move {
//!                 // e.g. authenticate, then fall through to the next handler.
//!                 next.run(req).await
//!             }),
//!             RouteHandler::new(|_req: Request<Incoming>, _next: Next<Incoming>| async move {
//!                 Ok(Response::new(Full::new(Bytes::from("Admin area"))))
//!             }),
//!         ],
//!     )
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Options
//!
//! [`RouteOptions`] are fixed per router instance and apply to every route
//! registered through its builder:
//!
//! ```
//! use cascade::{RouteOptions, Router};
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::Response;
//!
//! # fn run() -> Router<Incoming> {
//! let router = Router::builder_with(RouteOptions {
//!     sensitive: true,
//!     trailing: false,
//! })
//! .get("/About", |_req, _next| async move {
//!     // Only "/About" matches now; neither "/about" nor "/About/" does.
//!     Ok(Response::new(Full::new(Bytes::from("About page"))))
//! })
//! .build()
//! .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Error handling
//!
//! A handler returns `cascade::Result<Response<Full<Bytes>>>`; any error, as
//! well as a parameter value which can't be percent-decoded, propagates out
//! of the dispatch. The request service turns it into a response through the
//! router's error handler, or a plain `500` without one:
//!
//! ```
//! use cascade::Router;
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::{Response, StatusCode};
//!
//! # fn run() -> Router<Incoming> {
//! let router = Router::builder()
//!     .get("/users", |_req, _next| async move {
//!         Err(cascade::Error::new("it might raise an error").into())
//!     })
//!     .err_handler(|err| async move {
//!         let mut res = Response::new(Full::new(Bytes::from(format!("Something went wrong: {}", err))));
//!         *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
//!         res
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```

pub use self::error::{Error, RouteError};
pub use self::pattern::{Matcher, ParamKind, RouteOptions};
pub use self::route::{Route, RouteHandler};
pub use self::router::{Next, Router, RouterBuilder, Tail};
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::{RequestServiceBuilder, RouterService};
pub use self::types::RouteParams;

mod error;
pub mod ext;
mod helpers;
mod pattern;
pub mod prelude;
mod route;
mod router;
mod service;
mod types;

/// A Result type often returned from methods that can have cascade errors.
pub type Result<T> = std::result::Result<T, RouteError>;
