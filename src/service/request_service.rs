use crate::helpers;
use crate::router::{Router, Tail};
use crate::types::RequestMeta;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode, service::Service};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// A hyper [`Service`](hyper::service::Service) which dispatches the requests
/// of one connection through a shared [`Router`].
///
/// When every route defers, it answers `404 Not Found`; when a dispatch
/// errors, the router's error handler (or a plain `500`) produces the
/// response.
pub struct RequestService<B> {
    pub(crate) router: Arc<Router<B>>,
    pub(crate) remote_addr: SocketAddr,
}

impl<B> Service<Request<B>> for RequestService<B>
where
    B: Body + Send + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = crate::RouteError;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, mut req: Request<B>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let fut = async move {
            helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_remote_addr(remote_addr));

            match router.clone().dispatch(req, not_found_tail()).await {
                Ok(res) => Ok(res),
                Err(err) => Ok(router.handle_err(err).await),
            }
        };

        Box::pin(fut)
    }
}

impl<B> Debug for RequestService<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ router: {:?}, remote_addr: {:?} }}", self.router, self.remote_addr)
    }
}

// The default fallback when no route handles the request lives here, in the
// surrounding service layer, not in the router core.
fn not_found_tail<B: Send + 'static>() -> Tail<B> {
    Tail::new(|_req| async move {
        let mut res = Response::new(Full::new(Bytes::from("Not Found")));
        *res.status_mut() = StatusCode::NOT_FOUND;
        Ok(res)
    })
}

/// Wraps a built [`Router`] once and mints a [`RequestService`] per
/// connection.
pub struct RequestServiceBuilder<B> {
    router: Arc<Router<B>>,
}

impl<B: Body + Send + 'static> RequestServiceBuilder<B> {
    pub fn new(router: Router<B>) -> RequestServiceBuilder<B> {
        RequestServiceBuilder {
            router: Arc::new(router),
        }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService<B> {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}

impl<B> Debug for RequestServiceBuilder<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ router: {:?} }}", self.router)
    }
}
