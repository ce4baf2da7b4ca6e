use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::files::ContentCache;
use crate::http::connection::Connection;
use crate::server::access_log::ConnectionLog;
use crate::site::Site;

/// A bound file server, ready to accept connections.
pub struct Server {
    listener: TcpListener,
    site: Arc<Site>,
    handle: ServerHandle,
}

/// Cloneable control and status handle for a running [`Server`].
#[derive(Clone)]
pub struct ServerHandle {
    inner: Arc<Shared>,
}

struct Shared {
    port: u16,
    running: AtomicBool,
    shutdown: watch::Sender<bool>,
    workers: Arc<Semaphore>,
    pool_size: usize,
    log: Option<ConnectionLog>,
}

impl Server {
    /// Validates the document root and binds the listening socket. Any
    /// failure here aborts startup.
    pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        let site = Site::open(cfg, ContentCache::new()).await?;

        let addr = cfg.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let port = listener.local_addr()?.port();

        let (shutdown, _) = watch::channel(false);
        let handle = ServerHandle {
            inner: Arc::new(Shared {
                port,
                running: AtomicBool::new(false),
                shutdown,
                workers: Arc::new(Semaphore::new(cfg.pool_size)),
                pool_size: cfg.pool_size,
                log: cfg.connection_log.clone().map(ConnectionLog::new),
            }),
        };

        Ok(Self {
            listener,
            site: Arc::new(site),
            handle,
        })
    }

    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Accepts connections until [`ServerHandle::stop`] is called, then
    /// waits for in-flight connections to finish.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server { listener, site, handle } = self;
        let shared = &handle.inner;

        let mut shutdown = shared.shutdown.subscribe();
        if *shutdown.borrow_and_update() {
            return Ok(());
        }

        shared.running.store(true, Ordering::SeqCst);
        info!("Accepting connections on port {}", shared.port);
        info!("Document Root: {}", site.resolver.root().display());

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,

                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => dispatch(socket, peer, &site, shared).await,
                    Err(e) => warn!(error = %e, "Error accepting connection"),
                },
            }
        }

        drop(listener);
        shared.running.store(false, Ordering::SeqCst);

        // In-flight connections keep their permits until they finish.
        let permits = u32::try_from(shared.pool_size)?;
        let _drained = shared.workers.acquire_many(permits).await?;
        info!("Server stopped");
        Ok(())
    }
}

async fn dispatch(socket: TcpStream, peer: SocketAddr, site: &Arc<Site>, shared: &Shared) {
    info!("Accepted connection from {}", peer);

    if let Some(log) = &shared.log {
        if let Err(e) = log.record(peer).await {
            warn!(error = %e, "Error logging connection");
        }
    }
    let entries = site.cache.len().await;
    let bytes = site.cache.total_bytes().await;
    debug!(entries, bytes, "Cache status");

    let site = Arc::clone(site);
    let workers = Arc::clone(&shared.workers);
    tokio::spawn(async move {
        let Ok(_permit) = workers.acquire_owned().await else {
            return;
        };
        let mut conn = Connection::new(socket, site, peer.to_string());
        if let Err(e) = conn.run().await {
            warn!("Error talking to {}: {}", peer, e);
        }
    });
}

impl ServerHandle {
    /// Stops accepting connections. Idempotent; in-flight connections are
    /// allowed to finish.
    pub fn stop(&self) {
        if !self.inner.shutdown.send_replace(true) {
            info!("Stopping server");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// The port actually bound.
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// The connection log, for viewers that display it.
    pub fn connection_log(&self) -> Option<&ConnectionLog> {
        self.inner.log.as_ref()
    }

    /// Connections currently being handled.
    pub fn active_workers(&self) -> usize {
        self.inner.pool_size - self.inner.workers.available_permits()
    }

    pub fn pool_size(&self) -> usize {
        self.inner.pool_size
    }
}
