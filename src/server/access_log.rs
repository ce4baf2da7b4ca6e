use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::http::writer::http_date;

/// Append-only text log with one line per accepted connection.
#[derive(Debug, Clone)]
pub struct ConnectionLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl ConnectionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn record(&self, peer: SocketAddr) -> std::io::Result<()> {
        let line = format!("Connection from: {} at {}\n", peer, http_date());

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }

    /// Current content of the log; empty if nothing was logged yet.
    pub async fn contents(&self) -> std::io::Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}
