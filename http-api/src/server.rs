//! HTTP server assembly and listener lifecycle
//!
//! The router is only constructible from an already-initialized repository,
//! so no request can ever be dispatched before the persistence layer is up.
//! Binding and serving are split so callers can observe the bound address
//! (and tests can bind port 0) before the accept loop starts.

use axum::{middleware, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::{handler::TaskHandler, request_log, routes};
use tracker_core::TaskRepository;

/// Errors raised while standing up or running the listener
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every route group
pub struct AppState<R> {
    pub handler: TaskHandler<R>,
}

/// HTTP server over any task repository
pub struct HttpServer<R> {
    state: Arc<AppState<R>>,
}

impl<R: TaskRepository + 'static> HttpServer<R> {
    /// Create the server over an already-initialized repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            state: Arc::new(AppState {
                handler: TaskHandler::new(repository),
            }),
        }
    }

    /// Assemble the application router.
    ///
    /// Route groups are registered from an explicit list; adding an endpoint
    /// means adding it here.
    pub fn router(&self) -> Router {
        let mut app: Router<Arc<AppState<R>>> = Router::new();
        for group in [routes::health::routes(), routes::tasks::routes()] {
            app = app.merge(group);
        }

        app.layer(middleware::from_fn(request_log::log_requests))
            .with_state(self.state.clone())
    }

    /// Bind the TCP listener without starting the accept loop.
    ///
    /// A bind failure (port conflict, bad address) surfaces here and leaves
    /// nothing listening.
    pub async fn bind(&self, addr: &str) -> Result<BoundServer, ServerError> {
        let socket_addr: SocketAddr = addr.parse().map_err(|source| {
            ServerError::InvalidAddress {
                addr: addr.to_string(),
                source,
            }
        })?;

        let listener = TcpListener::bind(socket_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: socket_addr,
                source,
            })?;

        Ok(BoundServer {
            listener,
            router: self.router(),
        })
    }
}

/// A server with its port bound, ready to serve
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
}

impl BoundServer {
    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop until `shutdown` resolves, then drain in-flight
    /// requests and return. Blocks the calling task for the server's
    /// lifetime.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = self.local_addr() {
            info!(%addr, "listening");
        }

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("listener stopped");
        Ok(())
    }
}
