use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on `pool_size`.
pub const MAX_POOL_SIZE: usize = 65_536;

/// Runtime configuration of the file server.
///
/// Every field has a default, so a YAML document only needs to list the
/// values it wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory tree files are served from
    pub document_root: PathBuf,
    /// Interface to bind
    pub host: String,
    /// Listening port (0 asks the OS for a free one)
    pub port: u16,
    /// File appended to targets ending in `/`
    pub index_file: String,
    /// Maximum number of connections handled at the same time
    pub pool_size: usize,
    /// The one request path gated behind Basic authentication
    pub protected_path: String,
    /// Credentials store, relative to the document root
    pub credentials_file: String,
    /// Realm announced in the `WWW-Authenticate` challenge
    pub realm: String,
    /// Read timeout for the request head and body
    pub read_timeout_secs: u64,
    /// Upper bound on a POST body
    pub max_body_bytes: usize,
    /// Append-only connection log; `None` disables it
    pub connection_log: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("."),
            host: "0.0.0.0".to_string(),
            port: 80,
            index_file: "index.html".to_string(),
            pool_size: 50,
            protected_path: "/MyResource.html".to_string(),
            credentials_file: "user.txt".to_string(),
            realm: "MyRealm".to_string(),
            read_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            connection_log: Some(PathBuf::from("connection_log.txt")),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration: the YAML file if one is given, defaults
    /// otherwise, then `JHTTP_*` environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies overrides from an environment-like lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("JHTTP_ROOT") {
            self.document_root = PathBuf::from(root);
        }
        if let Some(host) = lookup("JHTTP_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("JHTTP_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("JHTTP_PORT is not a valid port: {port}"))?;
        }
        if let Some(size) = lookup("JHTTP_POOL_SIZE") {
            self.pool_size = size
                .trim()
                .parse()
                .with_context(|| format!("JHTTP_POOL_SIZE is not a number: {size}"))?;
        }
        if let Some(secs) = lookup("JHTTP_READ_TIMEOUT") {
            self.read_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("JHTTP_READ_TIMEOUT is not a number: {secs}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pool_size == 0 {
            anyhow::bail!("pool_size must be at least 1");
        }
        if self.pool_size > MAX_POOL_SIZE {
            anyhow::bail!("pool_size must be at most {MAX_POOL_SIZE}: {}", self.pool_size);
        }
        if !self.protected_path.starts_with('/') {
            anyhow::bail!("protected_path must start with '/': {}", self.protected_path);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
