//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tcg_shelf_fetcher::CardCatalog;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::error::ApiError;
use crate::router::Router;

/// HTTP server for the collection API.
pub struct Server<C> {
    listener: TcpListener,
    router: Arc<Router<C>>,
}

impl<C: CardCatalog + 'static> Server<C> {
    /// Bind the listening socket. Port 0 picks an ephemeral port.
    pub async fn bind(addr: impl ToSocketAddrs, router: Router<C>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the process is killed.
    pub async fn serve(self) -> std::io::Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves. Connections already accepted are
    /// left to finish on their own tasks.
    pub async fn serve_with_shutdown(
        self,
        shutdown: impl Future<Output = ()>,
    ) -> std::io::Result<()> {
        log::info!("Server listening on http://{}", self.local_addr()?);
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::warn!("Failed to accept connection: {e}");
                        continue;
                    }
                },
                () = &mut shutdown => {
                    log::info!("Shutting down server");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);
            tokio::task::spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                let service =
                    hyper::service::service_fn(move |req| handle_request(req, Arc::clone(&router)));
                if let Err(err) = builder.serve_connection(io, service).await {
                    log::debug!("Error serving connection from {peer}: {err}");
                }
            });
        }
    }
}

/// Route one request, logging its outcome. A panicking handler becomes a
/// 503 instead of tearing down the connection.
async fn handle_request<C: CardCatalog + 'static>(
    req: Request<Incoming>,
    router: Arc<Router<C>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match AssertUnwindSafe(router.route(req)).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            log::error!("Handler panicked on {method} {path}");
            let mut response: Response<Bytes> = ApiError::internal("handler panicked").into();
            response.headers_mut().insert(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                hyper::header::HeaderValue::from_static("*"),
            );
            response
        }
    };

    log::info!(
        "{method} {path} -> {} ({:.1?})",
        response.status().as_u16(),
        start.elapsed()
    );
    Ok(response.map(Full::new))
}
