//! HTTP protocol implementation.
//!
//! One request per connection: the server reads a request head, answers it,
//! and closes the connection.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine that routes a request and answers it
//! - **`parser`**: Reads the request line and header lines from a buffered stream
//! - **`request`**: Request representation and method tags
//! - **`response`**: Response representation, builder and the generated pages
//! - **`writer`**: Writes the header block and body onto the connection
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read request line and headers
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌─────────────┐
//!        │   Parsed    │ ← Route by method
//!        └──────┬──────┘
//!               │ GET/HEAD on a resolvable file
//!               ├──────────────────────┐
//!               │                      ▼ protected path
//!               │            ┌──────────────────┐
//!               │            │  Authenticating  │ ── failure → 401
//!               │            └────────┬─────────┘
//!               ▼                     │ success
//!        ┌─────────────┐              │
//!        │   Routed    │ ◄────────────┘ ← Cache lookup, disk read on miss
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │ Responding  │ ← 200 / 401 / 404 / 501, POST echo
//!        └──────┬──────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use jhttp::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! loop {
//!     let (socket, peer) = listener.accept().await?;
//!     let site = site.clone();
//!     tokio::spawn(async move {
//!         let mut conn = Connection::new(socket, site, peer.to_string());
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     });
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
