use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, BufReader, ReadHalf, WriteHalf};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::files::Resolved;
use crate::http::mime;
use crate::http::parser::{read_request, ParseError};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::{Framing, ResponseWriter};
use crate::site::Site;

/// One request/response cycle on one connection.
///
/// Generic over the stream so the same state machine runs on TCP sockets
/// and in-memory pipes.
pub struct Connection<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: ResponseWriter<WriteHalf<S>>,
    site: Arc<Site>,
    peer: String,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Parsed(Request),
    /// Target resolved to a file the client may receive
    Routed(Request, Resolved),
    Authenticating(Request, Resolved),
    Responding(Response, Framing),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<Site>, peer: impl Into<String>) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read_half),
            writer: ResponseWriter::new(write_half),
            site,
            peer: peer.into(),
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion. The output side is shut down
    /// exactly once, whatever happened before.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.writer.close().await {
            warn!(peer = %self.peer, error = %e, "Error closing connection");
        }
        self.state = ConnectionState::Closed;

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => self.read().await?,

                ConnectionState::Parsed(req) => self.route(req).await?,

                ConnectionState::Authenticating(req, resolved) => {
                    if self.site.auth.check(req.authorization.as_deref()).await {
                        ConnectionState::Routed(req, resolved)
                    } else {
                        debug!(peer = %self.peer, path = %resolved.key, "Authentication failed");
                        respond(&req, Response::unauthorized(&self.site.realm))
                    }
                }

                ConnectionState::Routed(req, resolved) => self.serve_file(req, resolved).await,

                ConnectionState::Responding(response, framing) => {
                    self.writer.send(&response, framing).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read(&mut self) -> anyhow::Result<ConnectionState> {
        let parsed = match timeout(self.site.read_timeout, read_request(&mut self.reader)).await {
            Ok(parsed) => parsed,
            Err(_) => {
                debug!(peer = %self.peer, "Timed out waiting for request");
                return Ok(ConnectionState::Closed);
            }
        };

        match parsed {
            Ok(req) => {
                debug!(
                    peer = %self.peer,
                    method = req.method.as_str(),
                    request_target = %req.target,
                    version = %req.version,
                    "Request received"
                );
                Ok(ConnectionState::Parsed(req))
            }
            Err(ParseError::ConnectionClosed) => Ok(ConnectionState::Closed),
            Err(e @ (ParseError::Malformed | ParseError::TooLarge)) => {
                debug!(peer = %self.peer, error = %e, "Rejected request head");
                Ok(ConnectionState::Responding(Response::not_implemented(), Framing::BODY_ONLY))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn route(&mut self, req: Request) -> anyhow::Result<ConnectionState> {
        let next = match req.method {
            Method::GET | Method::HEAD => self.route_file(req).await,
            Method::POST => {
                let text = self.read_body(&req).await?;
                respond(&req, Response::post_echo(&text))
            }
            Method::OTHER(_) => respond(&req, Response::not_implemented()),
        };
        Ok(next)
    }

    async fn route_file(&self, req: Request) -> ConnectionState {
        let Some(resolved) = self.site.resolver.resolve(&req.target).await else {
            return not_found(&req);
        };
        if self.site.is_hidden(&resolved).await {
            return not_found(&req);
        }
        if self.site.is_protected(&resolved).await {
            ConnectionState::Authenticating(req, resolved)
        } else {
            ConnectionState::Routed(req, resolved)
        }
    }

    /// Serves a permitted file from the cache, loading it on a miss.
    async fn serve_file(&self, req: Request, resolved: Resolved) -> ConnectionState {
        let body = match self.site.cache.get(&resolved.key).await {
            Some(body) => {
                debug!(path = %resolved.key, "Cache hit");
                body
            }
            None => match tokio::fs::read(&resolved.path).await {
                Ok(data) => self.site.cache.put(resolved.key.clone(), data.into()).await,
                Err(e) => {
                    debug!(path = %resolved.key, error = %e, "File unreadable");
                    return not_found(&req);
                }
            },
        };

        respond(&req, Response::file(body, mime::content_type_for(&resolved.key)))
    }

    /// Reads a POST body and flattens its lines into one string.
    ///
    /// Bounded by Content-Length when the client sent one, otherwise read
    /// until end of stream. Either way the read stops at the read timeout
    /// and at `max_body_bytes`, keeping whatever arrived. Declared bytes
    /// past `max_body_bytes` are read and discarded so the client still
    /// receives the echo.
    async fn read_body(&mut self, req: &Request) -> anyhow::Result<String> {
        let declared = req.content_length();
        let limit = declared.unwrap_or(usize::MAX).min(self.site.max_body_bytes);

        let mut raw = Vec::new();
        let read = timeout(
            self.site.read_timeout,
            (&mut self.reader).take(limit as u64).read_to_end(&mut raw),
        )
        .await;

        match read {
            Ok(result) => {
                result?;
            }
            Err(_) => {
                debug!(peer = %self.peer, received = raw.len(), "Timed out reading body");
                return Ok(flatten_lines(&raw));
            }
        }

        if let Some(excess) = declared.and_then(|n| n.checked_sub(limit)).filter(|n| *n > 0) {
            debug!(peer = %self.peer, excess, "Discarding body past limit");
            let mut rest = (&mut self.reader).take(excess as u64);
            let drained = timeout(
                self.site.read_timeout,
                tokio::io::copy(&mut rest, &mut tokio::io::sink()),
            )
            .await;
            if let Ok(Err(e)) = drained {
                debug!(peer = %self.peer, error = %e, "Error discarding body");
            }
        }

        Ok(flatten_lines(&raw))
    }
}

/// Picks what goes on the wire: HEAD never gets a body, and 404/501
/// answers to version-less requests get no status line or headers.
fn framing(req: &Request, response: &Response) -> Framing {
    Framing {
        headers: req.is_http() || !response.status.is_version_gated(),
        body: req.method != Method::HEAD,
    }
}

fn flatten_lines(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).lines().collect()
}

fn respond(req: &Request, response: Response) -> ConnectionState {
    let framing = framing(req, &response);
    ConnectionState::Responding(response, framing)
}

fn not_found(req: &Request) -> ConnectionState {
    respond(req, Response::not_found())
}
