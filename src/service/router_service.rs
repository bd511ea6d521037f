use crate::router::Router;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use hyper::body::Body;
use hyper::service::Service;
use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::future::{Ready, ready};
use tokio::net::TcpStream;

/// A connection-level [`Service`](hyper::service::Service): for every
/// accepted [`TcpStream`] it produces a [`RequestService`] bound to that
/// connection's peer address.
///
/// # Examples
///
/// ```no_run
/// use cascade::{Router, RouterService};
/// use http_body_util::Full;
/// use hyper::body::{Bytes, Incoming};
/// use hyper::service::Service;
/// use hyper::{Request, Response};
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use std::net::SocketAddr;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// fn router() -> Router<Incoming> {
///     Router::builder()
///         .get("/", |_req, _next| async move {
///             Ok(Response::new(Full::new(Bytes::from("Home page"))))
///         })
///         .build()
///         .unwrap()
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let service = Arc::new(RouterService::new(router()));
///
///     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
///     let listener = TcpListener::bind(addr).await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let service = service.clone();
///
///         tokio::spawn(async move {
///             let request_service = service.call(&stream).await.unwrap();
///             let io = TokioIo::new(stream);
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
pub struct RouterService<B> {
    builder: RequestServiceBuilder<B>,
}

impl<B: Body + Send + 'static> RouterService<B> {
    /// Creates a new service for the provided router.
    pub fn new(router: Router<B>) -> RouterService<B> {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }
}

impl<B: Body + Send + 'static> Service<&TcpStream> for RouterService<B> {
    type Response = RequestService<B>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = conn
            .peer_addr()
            .unwrap_or_else(|_| std::net::SocketAddr::from(([0, 0, 0, 0], 0)));

        ready(Ok(self.builder.build(addr)))
    }
}

impl<B> Debug for RouterService<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ builder: {:?} }}", self.builder)
    }
}
