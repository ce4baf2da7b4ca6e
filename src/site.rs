use std::time::Duration;

use anyhow::Context;

use crate::auth::AuthChecker;
use crate::config::ServerConfig;
use crate::files::{ContentCache, PathResolver, Resolved};

/// Everything a connection needs to answer a request. One instance is
/// shared by all connections of a server.
#[derive(Debug, Clone)]
pub struct Site {
    pub resolver: PathResolver,
    pub cache: ContentCache,
    pub auth: AuthChecker,
    /// Request key that requires Basic credentials, index file appended
    /// for directory paths
    pub protected_path: String,
    pub realm: String,
    pub read_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Site {
    /// Opens the document root named by `cfg`. Fails if it is not a
    /// directory.
    pub async fn open(cfg: &ServerConfig, cache: ContentCache) -> anyhow::Result<Self> {
        let resolver = PathResolver::open(&cfg.document_root, cfg.index_file.clone()).await?;
        let auth = AuthChecker::new(resolver.root().join(&cfg.credentials_file));
        let protected_path = resolver
            .request_key(&cfg.protected_path)
            .with_context(|| format!("invalid protected_path {}", cfg.protected_path))?;

        Ok(Self {
            resolver,
            cache,
            auth,
            protected_path,
            realm: cfg.realm.clone(),
            read_timeout: cfg.read_timeout(),
            max_body_bytes: cfg.max_body_bytes,
        })
    }

    /// Whether serving `resolved` requires authentication. Matches the
    /// request path and also any alias that lands on the same file.
    pub async fn is_protected(&self, resolved: &Resolved) -> bool {
        if resolved.key == self.protected_path {
            return true;
        }
        let protected = self
            .resolver
            .root()
            .join(self.protected_path.trim_start_matches('/'));
        same_file(&protected, resolved).await
    }

    /// The credentials store is never served.
    pub async fn is_hidden(&self, resolved: &Resolved) -> bool {
        same_file(self.auth.store_path(), resolved).await
    }
}

async fn same_file(candidate: &std::path::Path, resolved: &Resolved) -> bool {
    tokio::fs::canonicalize(candidate)
        .await
        .is_ok_and(|p| p == resolved.path)
}
