use crate::helpers;
use crate::pattern::RouteOptions;
use crate::route::{HandlerReturn, Route, RouteHandler};
use crate::types::RequestMeta;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
type TailFn<B> = dyn Fn(Request<B>) -> HandlerReturn + Send + Sync + 'static;
type ErrHandler = Box<dyn Fn(crate::RouteError) -> ErrHandlerReturn + Send + Sync + 'static>;
type ErrHandlerReturn = Box<dyn Future<Output = Response<Full<Bytes>>> + Send + 'static>;

/// An ordered pipeline of [`Route`]s over a shared set of [`RouteOptions`].
///
/// Routes are tested strictly in registration order; that order is fixed once
/// the router is built and never changes at runtime. Dispatch touches no
/// router-level mutable state, so one `Arc<Router>` serves any number of
/// concurrent requests.
///
/// Routes here are middleware, not early-exit lookup entries: a matching
/// route's handler may call [`Next::run`] to hand control onwards, so several
/// routes registered for the same method and path all run, in registration
/// order, as long as each one forwards.
pub struct Router<B> {
    pub(crate) routes: Vec<Route<B>>,
    pub(crate) options: RouteOptions,
    pub(crate) err_handler: Option<ErrHandler>,
}

impl<B: Send + 'static> Router<B> {
    /// Creates a builder with the default [`RouteOptions`] (case-insensitive,
    /// optional trailing slash).
    pub fn builder() -> RouterBuilder<B> {
        RouterBuilder::new(RouteOptions::default())
    }

    /// Creates a builder whose options apply to every route registered
    /// through it.
    pub fn builder_with(options: RouteOptions) -> RouterBuilder<B> {
        RouterBuilder::new(options)
    }

    /// The registered routes, in registration order.
    pub fn routes(&self) -> &[Route<B>] {
        &self.routes
    }

    /// The options shared by all routes of this router.
    pub fn options(&self) -> RouteOptions {
        self.options
    }

    /// Dispatches a request through the pipeline.
    ///
    /// Each route either handles the request or defers; when every route has
    /// deferred, the provided `tail` continuation runs. The surrounding
    /// framework owns that final step (typically a "404 Not Found" response,
    /// as [`RequestService`](crate::RequestService) does).
    pub async fn dispatch(self: Arc<Self>, req: Request<B>, tail: Tail<B>) -> crate::Result<Response<Full<Bytes>>> {
        dispatch_from(self, 0, 0, req, tail).await
    }

    pub(crate) async fn handle_err(&self, err: crate::RouteError) -> Response<Full<Bytes>> {
        match self.err_handler {
            Some(ref handler) => Pin::from(handler(err)).await,
            None => {
                let mut res = Response::new(Full::new(Bytes::from(format!("Something went wrong: {}", err))));
                *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                res
            }
        }
    }
}

impl<B> Debug for Router<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ routes: {:?}, options: {:?} }}", self.routes, self.options)
    }
}

/// The final continuation of a dispatch, run when every route has deferred.
pub struct Tail<B>(Arc<TailFn<B>>);

impl<B> Tail<B> {
    /// Wraps the surrounding framework's fallback step.
    pub fn new<H, R>(handler: H) -> Tail<B>
    where
        H: Fn(Request<B>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        let tail: Arc<TailFn<B>> = Arc::new(move |req| Box::new(handler(req)));
        Tail(tail)
    }
}

impl<B> Clone for Tail<B> {
    fn clone(&self) -> Tail<B> {
        Tail(self.0.clone())
    }
}

impl<B> Debug for Tail<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Tail")
    }
}

/// The explicit forward continuation handed to every route handler.
///
/// Calling [`run`](Next::run) passes control to the rest of the pipeline: the
/// remaining handlers of the current route first, then the subsequent routes,
/// and finally the tail. Not calling it ends the dispatch with this handler's
/// response.
pub struct Next<B> {
    router: Arc<Router<B>>,
    route_idx: usize,
    handler_idx: usize,
    tail: Tail<B>,
}

impl<B: Send + 'static> Next<B> {
    /// Hands the request to the next step of the pipeline and resolves to its
    /// response.
    pub async fn run(self, req: Request<B>) -> crate::Result<Response<Full<Bytes>>> {
        dispatch_from(self.router, self.route_idx, self.handler_idx, req, self.tail).await
    }
}

impl<B> Debug for Next<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ route_idx: {}, handler_idx: {} }}",
            self.route_idx, self.handler_idx
        )
    }
}

// The dispatch loop. `handler_idx == 0` means the route at `route_idx` hasn't
// been entered yet and must pass the method and path tests first; a non-zero
// index resumes inside that route's handler chain.
fn dispatch_from<B: Send + 'static>(
    router: Arc<Router<B>>,
    route_idx: usize,
    handler_idx: usize,
    mut req: Request<B>,
    tail: Tail<B>,
) -> BoxFuture<crate::Result<Response<Full<Bytes>>>> {
    Box::pin(async move {
        let mut route_idx = route_idx;
        let mut handler_idx = handler_idx;

        loop {
            let route = match router.routes.get(route_idx) {
                Some(route) => route,
                None => return Pin::from((tail.0)(req)).await,
            };

            if handler_idx == 0 {
                if !route.is_match_method(req.method()) {
                    route_idx += 1;
                    continue;
                }

                let params = match route.match_path(req.uri().path())? {
                    Some(params) => params,
                    None => {
                        route_idx += 1;
                        continue;
                    }
                };

                // A later match overwrites the one an earlier pipeline step
                // attached.
                helpers::update_req_meta_in_extensions(
                    req.extensions_mut(),
                    RequestMeta::with_route(params, route.pattern.clone()),
                );
            } else if handler_idx >= route.handlers.len() {
                // The previous handler of this route forwarded past the end
                // of its own chain; move on to the next route.
                route_idx += 1;
                handler_idx = 0;
                continue;
            }

            let handler = &route.handlers[handler_idx];
            let next = Next {
                router: router.clone(),
                route_idx,
                handler_idx: handler_idx + 1,
                tail,
            };

            return Pin::from(handler(req, next)).await;
        }
    })
}

/// Builds a [`Router`].
///
/// Registration methods hand the builder back for chaining; the first
/// configuration error is kept and reported by [`build`](RouterBuilder::build),
/// leaving previously registered routes intact.
pub struct RouterBuilder<B> {
    routes: Vec<Route<B>>,
    options: RouteOptions,
    err_handler: Option<ErrHandler>,
    err: Option<crate::RouteError>,
}

macro_rules! method_fn {
    ($name:ident, $method:expr, $doc:expr) => {
        #[doc = $doc]
        pub fn $name<P, H, R>(self, pattern: P, handler: H) -> Self
        where
            P: Into<String>,
            H: Fn(Request<B>, Next<B>) -> R + Send + Sync + 'static,
            R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
        {
            self.register(Some($method), pattern, vec![RouteHandler::new(handler)])
        }
    };
}

impl<B: Send + 'static> RouterBuilder<B> {
    pub(crate) fn new(options: RouteOptions) -> RouterBuilder<B> {
        RouterBuilder {
            routes: Vec::new(),
            options,
            err_handler: None,
            err: None,
        }
    }

    /// Registers a route with an explicit method (`None` matches any method)
    /// and a handler chain of one or more handlers.
    ///
    /// An empty chain is a configuration error, surfaced by
    /// [`build`](RouterBuilder::build) with the offending method and pattern.
    pub fn register<P: Into<String>>(
        mut self,
        method: Option<Method>,
        pattern: P,
        handlers: Vec<RouteHandler<B>>,
    ) -> Self {
        if self.err.is_some() {
            return self;
        }

        match Route::new(method, pattern.into(), handlers, self.options) {
            Ok(route) => self.routes.push(route),
            Err(err) => self.err = Some(err),
        }

        self
    }

    method_fn!(get, Method::GET, "Registers a `GET` route. It also answers `HEAD` requests for the same pattern.");
    method_fn!(post, Method::POST, "Registers a `POST` route.");
    method_fn!(put, Method::PUT, "Registers a `PUT` route.");
    method_fn!(delete, Method::DELETE, "Registers a `DELETE` route.");
    method_fn!(head, Method::HEAD, "Registers a `HEAD` route.");
    method_fn!(options, Method::OPTIONS, "Registers an `OPTIONS` route.");
    method_fn!(patch, Method::PATCH, "Registers a `PATCH` route.");
    method_fn!(trace, Method::TRACE, "Registers a `TRACE` route.");

    /// Registers a route answering any request method.
    pub fn all<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<B>, Next<B>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        self.register(None, pattern, vec![RouteHandler::new(handler)])
    }

    /// Attaches an error handler which turns a [`RouteError`](crate::RouteError)
    /// escaping a dispatch into a response. Without one, the request service
    /// answers with a plain `500`.
    pub fn err_handler<H, R>(mut self, handler: H) -> Self
    where
        H: Fn(crate::RouteError) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        let handler: ErrHandler = Box::new(move |err| Box::new(handler(err)));
        self.err_handler = Some(handler);
        self
    }

    /// Finishes the builder. Reports the first configuration error raised
    /// during registration, if any.
    pub fn build(self) -> crate::Result<Router<B>> {
        if let Some(err) = self.err {
            return Err(err);
        }

        Ok(Router {
            routes: self.routes,
            options: self.options,
            err_handler: self.err_handler,
        })
    }
}

impl<B> Debug for RouterBuilder<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ routes: {:?}, options: {:?} }}", self.routes, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::{Next, Router, Tail};
    use crate::ext::RequestExt;
    use http_body_util::{Empty, Full};
    use hyper::body::Bytes;
    use hyper::{Method, Request, Response, StatusCode};
    use std::sync::{Arc, Mutex};

    type TestBody = Empty<Bytes>;

    fn request(method: Method, path: &str) -> Request<TestBody> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Empty::new())
            .unwrap()
    }

    fn text_response(text: String) -> crate::Result<Response<Full<Bytes>>> {
        Ok(Response::new(Full::new(Bytes::from(text))))
    }

    fn not_found_tail() -> Tail<TestBody> {
        Tail::new(|_req| async move {
            let mut res = Response::new(Full::new(Bytes::from("nothing matched")));
            *res.status_mut() = StatusCode::NOT_FOUND;
            Ok(res)
        })
    }

    async fn body_text(res: Response<Full<Bytes>>) -> String {
        use http_body_util::BodyExt;
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn stacked_routes_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let c1 = calls.clone();
        let c2 = calls.clone();
        let router = Arc::new(
            Router::builder()
                .get("/stack", move |req: Request<TestBody>, next: Next<TestBody>| {
                    let calls = c1.clone();
                    async move {
                        calls.lock().unwrap().push("first");
                        next.run(req).await
                    }
                })
                .get("/stack", move |_req: Request<TestBody>, _next: Next<TestBody>| {
                    let calls = c2.clone();
                    async move {
                        calls.lock().unwrap().push("second");
                        text_response("done".to_owned())
                    }
                })
                .build()
                .unwrap(),
        );

        let res = router
            .dispatch(request(Method::GET, "/stack"), not_found_tail())
            .await
            .unwrap();
        assert_eq!(body_text(res).await, "done");
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn handlers_of_one_route_run_in_chain_order() {
        let router = Arc::new(
            Router::builder()
                .register(
                    Some(Method::GET),
                    "/chain",
                    vec![
                        crate::RouteHandler::new(|req: Request<TestBody>, next: Next<TestBody>| async move {
                            next.run(req).await
                        }),
                        crate::RouteHandler::new(|_req: Request<TestBody>, _next: Next<TestBody>| async move {
                            text_response("inner".to_owned())
                        }),
                    ],
                )
                .build()
                .unwrap(),
        );

        let res = router
            .dispatch(request(Method::GET, "/chain"), not_found_tail())
            .await
            .unwrap();
        assert_eq!(body_text(res).await, "inner");
    }

    #[tokio::test]
    async fn falls_through_to_the_tail_when_nothing_matches() {
        let router = Arc::new(
            Router::<TestBody>::builder()
                .get("/users", |_req: Request<TestBody>, _next: Next<TestBody>| async move {
                    text_response("users".to_owned())
                })
                .build()
                .unwrap(),
        );

        let res = router
            .dispatch(request(Method::GET, "/posts"), not_found_tail())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn method_mismatch_defers_to_later_routes() {
        let router = Arc::new(
            Router::builder()
                .post("/thing", |_req: Request<TestBody>, _next: Next<TestBody>| async move {
                    text_response("created".to_owned())
                })
                .get("/thing", |_req: Request<TestBody>, _next: Next<TestBody>| async move {
                    text_response("fetched".to_owned())
                })
                .build()
                .unwrap(),
        );

        let res = router
            .dispatch(request(Method::GET, "/thing"), not_found_tail())
            .await
            .unwrap();
        assert_eq!(body_text(res).await, "fetched");
    }

    #[tokio::test]
    async fn a_later_match_overwrites_the_earlier_params() {
        let router = Arc::new(
            Router::builder()
                .get("/users/:id", |req: Request<TestBody>, next: Next<TestBody>| async move {
                    assert_eq!(req.route_path(), Some("/users/:id"));
                    assert!(req.params().has("id"));
                    next.run(req).await
                })
                .get("/users/:name", |req: Request<TestBody>, _next: Next<TestBody>| async move {
                    assert_eq!(req.route_path(), Some("/users/:name"));
                    assert!(!req.params().has("id"));
                    let name = req.param("name").cloned().unwrap_or_default();
                    text_response(name)
                })
                .build()
                .unwrap(),
        );

        let res = router
            .dispatch(request(Method::GET, "/users/alice"), not_found_tail())
            .await
            .unwrap();
        assert_eq!(body_text(res).await, "alice");
    }

    #[tokio::test]
    async fn not_forwarding_ends_the_dispatch() {
        let reached = Arc::new(Mutex::new(false));
        let flag = reached.clone();
        let router = Arc::new(
            Router::builder()
                .get("/page", |_req: Request<TestBody>, _next: Next<TestBody>| async move {
                    text_response("first wins".to_owned())
                })
                .get("/page", move |_req: Request<TestBody>, _next: Next<TestBody>| {
                    let flag = flag.clone();
                    async move {
                        *flag.lock().unwrap() = true;
                        text_response("never".to_owned())
                    }
                })
                .build()
                .unwrap(),
        );

        let res = router
            .dispatch(request(Method::GET, "/page"), not_found_tail())
            .await
            .unwrap();
        assert_eq!(body_text(res).await, "first wins");
        assert!(!*reached.lock().unwrap());
    }

    #[test]
    fn empty_handler_chain_is_reported_at_build_time() {
        let err = Router::<TestBody>::builder()
            .register(Some(Method::GET), "/broken", Vec::new())
            .build()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GET"), "unexpected message: {}", msg);
        assert!(msg.contains("/broken"), "unexpected message: {}", msg);
    }

    #[test]
    fn a_registration_error_leaves_earlier_routes_intact() {
        let builder = Router::<TestBody>::builder()
            .get("/ok", |_req: Request<TestBody>, _next: Next<TestBody>| async move {
                text_response("ok".to_owned())
            })
            .register(None, "/broken", Vec::new());
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("ALL"));
    }
}
