use crate::Error;
use crate::helpers;
use crate::pattern::{Matcher, RouteOptions};
use crate::router::Next;
use crate::types::RouteParams;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

pub(crate) type Handler<B> = Box<dyn Fn(Request<B>, Next<B>) -> HandlerReturn + Send + Sync + 'static>;
pub(crate) type HandlerReturn = Box<dyn Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static>;

/// One boxed handler of a route's chain.
///
/// Mostly useful with [`RouterBuilder::register`](crate::RouterBuilder::register)
/// to stack several handlers on one route; the per-method builder methods box
/// their single handler themselves.
pub struct RouteHandler<B>(pub(crate) Handler<B>);

impl<B> RouteHandler<B> {
    /// Boxes a handler function.
    pub fn new<H, R>(handler: H) -> RouteHandler<B>
    where
        H: Fn(Request<B>, Next<B>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        let handler: Handler<B> = Box::new(move |req, next| Box::new(handler(req, next)));
        RouteHandler(handler)
    }
}

/// A single step in the dispatch pipeline.
///
/// A route pairs a compiled [`Matcher`] with an HTTP method (or "any") and a
/// non-empty handler chain. It shouldn't be created directly, use the
/// [`RouterBuilder`](crate::RouterBuilder) methods instead.
///
/// A route never changes after construction, only per-request match results
/// do, so routes are safely shared across simultaneous requests.
pub struct Route<B> {
    pub(crate) pattern: String,
    pub(crate) matcher: Matcher,
    pub(crate) method: Option<Method>,
    pub(crate) handlers: Vec<Handler<B>>,
}

impl<B> Route<B> {
    pub(crate) fn new(
        method: Option<Method>,
        pattern: String,
        handlers: Vec<RouteHandler<B>>,
        options: RouteOptions,
    ) -> crate::Result<Route<B>> {
        if handlers.is_empty() {
            return Err(Error::new(format!(
                "at least one handler is required for the route: {} {}",
                method_label(&method),
                pattern
            ))
            .into());
        }

        let matcher = Matcher::compile(pattern.as_str(), options)?;

        Ok(Route {
            pattern,
            matcher,
            method,
            handlers: handlers.into_iter().map(|h| h.0).collect(),
        })
    }

    /// The original pattern string this route was registered with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The method this route answers to; `None` means any method.
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    // A GET route also answers HEAD requests; that is the only cross-method
    // fallback.
    pub(crate) fn is_match_method(&self, method: &Method) -> bool {
        match self.method {
            None => true,
            Some(ref m) => m == method || (*m == Method::GET && *method == Method::HEAD),
        }
    }

    /// Tests the request path and decodes the captures. `None` means the
    /// route defers to the rest of the pipeline.
    pub(crate) fn match_path(&self, path: &str) -> crate::Result<Option<RouteParams>> {
        let raw = match self.matcher.captures(path) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let mut params = RouteParams::with_capacity(raw.len());
        for ((name, _), value) in self.matcher.params().iter().zip(raw) {
            if let Some(decoded) = helpers::decode_param(value)? {
                params.set(name.clone(), decoded);
            }
        }

        Ok(Some(params))
    }
}

fn method_label(method: &Option<Method>) -> &str {
    match method {
        Some(m) => m.as_str(),
        None => "ALL",
    }
}

impl<B> Debug for Route<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ pattern: {:?}, method: {:?}, matcher: {:?}, handlers: {} }}",
            self.pattern,
            self.method,
            self.matcher,
            self.handlers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, RouteHandler};
    use crate::pattern::RouteOptions;
    use http_body_util::{Empty, Full};
    use hyper::body::Bytes;
    use hyper::{Method, Response};

    type TestBody = Empty<Bytes>;

    fn route(method: Option<Method>, pattern: &str) -> Route<TestBody> {
        Route::new(
            method,
            pattern.to_owned(),
            vec![RouteHandler::new(|_, _| async move {
                Ok(Response::new(Full::new(Bytes::new())))
            })],
            RouteOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_an_empty_handler_chain() {
        let err = Route::<TestBody>::new(
            Some(Method::GET),
            "/users".to_owned(),
            Vec::new(),
            RouteOptions::default(),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GET"), "unexpected message: {}", msg);
        assert!(msg.contains("/users"), "unexpected message: {}", msg);
    }

    #[test]
    fn names_any_method_routes_as_all() {
        let err = Route::<TestBody>::new(None, "/users".to_owned(), Vec::new(), RouteOptions::default()).unwrap_err();
        assert!(err.to_string().contains("ALL"));
    }

    #[test]
    fn get_route_answers_head() {
        let r = route(Some(Method::GET), "/");
        assert!(r.is_match_method(&Method::GET));
        assert!(r.is_match_method(&Method::HEAD));
        assert!(!r.is_match_method(&Method::POST));
    }

    #[test]
    fn non_get_routes_never_answer_head() {
        let r = route(Some(Method::POST), "/");
        assert!(!r.is_match_method(&Method::HEAD));
        assert!(!r.is_match_method(&Method::PUT));
    }

    #[test]
    fn any_method_route_answers_everything() {
        let r = route(None, "/");
        assert!(r.is_match_method(&Method::GET));
        assert!(r.is_match_method(&Method::DELETE));
        assert!(r.is_match_method(&Method::HEAD));
    }

    #[test]
    fn decodes_captured_parameters() {
        let r = route(Some(Method::GET), "/package/:name");
        let params = r.match_path("/package/rust%20lang").unwrap().unwrap();
        assert_eq!(params.get("name").map(String::as_str), Some("rust lang"));
    }

    #[test]
    fn empty_greedy_capture_is_absent() {
        let r = route(Some(Method::GET), "/docs/:path+");
        let params = r.match_path("/docs/").unwrap().unwrap();
        assert!(!params.has("path"));
    }

    #[test]
    fn non_matching_path_defers_without_error() {
        let r = route(Some(Method::GET), "/users/:id");
        assert!(r.match_path("/posts/42").unwrap().is_none());
    }

    #[test]
    fn malformed_escape_fails_the_match() {
        let r = route(Some(Method::GET), "/package/:name");
        assert!(r.match_path("/package/%FF").is_err());
    }
}
