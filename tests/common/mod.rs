//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jhttp::config::ServerConfig;
use jhttp::files::ContentCache;
use jhttp::http::connection::Connection;
use jhttp::site::Site;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A scratch directory with a `www` document root inside it, so tests can
/// also place files outside the root. Removed on drop.
pub struct TempRoot {
    base: PathBuf,
    root: PathBuf,
}

impl TempRoot {
    pub fn new() -> Self {
        let base = std::env::temp_dir().join(format!(
            "jhttp-test-{}-{}",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::SeqCst)
        ));
        let root = base.join("www");
        std::fs::create_dir_all(&root).unwrap();
        Self { base, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Writes a file relative to the document root.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.root.join(rel), contents)
    }

    /// Writes a file next to (outside of) the document root.
    pub fn write_outside(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.base.join(rel), contents)
    }

    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            document_root: self.root.clone(),
            host: "127.0.0.1".to_string(),
            port: 0,
            read_timeout_secs: 2,
            connection_log: None,
            ..ServerConfig::default()
        }
    }

    pub async fn site(&self) -> Arc<Site> {
        Arc::new(Site::open(&self.config(), ContentCache::new()).await.unwrap())
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// Runs one connection over an in-memory pipe: sends `request`, closes the
/// client's write side and collects everything the server wrote.
pub async fn exchange(site: Arc<Site>, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(256 * 1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, site, "test-peer");
        conn.run().await
    });

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    out
}

/// A response split into header block and body. Responses written without
/// a status line have no head.
pub struct RawResponse {
    pub head: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(raw: &[u8]) -> Self {
        if !raw.starts_with(b"HTTP/") {
            return Self { head: None, body: raw.to_vec() };
        }
        let end = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header block terminator");
        Self {
            head: Some(String::from_utf8(raw[..end].to_vec()).unwrap()),
            body: raw[end + 4..].to_vec(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        let head = self.head.as_ref()?;
        head.lines().next()?.split_whitespace().nth(1)?.parse().ok()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.head.as_deref()?.lines().next()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.as_ref()?.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim().to_string())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub fn basic_auth(user: &str, pass: &str) -> String {
    use base64::Engine as _;
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"))
    )
}
