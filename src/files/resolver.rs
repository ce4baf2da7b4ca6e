use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

/// A request target that resolved to a servable file inside the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Normalized, decoded request path; the cache key
    pub key: String,
    /// Canonical filesystem path
    pub path: PathBuf,
}

/// Maps request targets onto files under a document root.
///
/// The only traversal defense is the prefix check on canonical paths, so it
/// runs after symlinks and `..` segments are resolved.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    index_file: String,
}

impl PathResolver {
    /// `root` must already be canonical.
    pub fn new(root: PathBuf, index_file: impl Into<String>) -> Self {
        Self {
            root,
            index_file: index_file.into(),
        }
    }

    /// Canonicalizes `root` and checks that it is a directory.
    pub async fn open(root: &Path, index_file: impl Into<String>) -> anyhow::Result<Self> {
        let meta = tokio::fs::metadata(root).await;
        if !meta.map(|m| m.is_dir()).unwrap_or(false) {
            anyhow::bail!("{} does not exist as a directory", root.display());
        }
        let root = tokio::fs::canonicalize(root).await?;
        Ok(Self::new(root, index_file))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a request target. Returns `None` for anything that is not a
    /// readable regular file inside the root; callers must not distinguish
    /// the reasons.
    pub async fn resolve(&self, target: &str) -> Option<Resolved> {
        let key = self.request_key(target)?;
        let joined = self.root.join(key.trim_start_matches('/'));

        let path = tokio::fs::canonicalize(&joined).await.ok()?;
        if !path.starts_with(&self.root) {
            tracing::debug!(request_target = %target, "Rejected path outside document root");
            return None;
        }

        let meta = tokio::fs::metadata(&path).await.ok()?;
        if !meta.is_file() {
            return None;
        }

        Some(Resolved { key, path })
    }

    /// Normalizes a raw target into the decoded request path: query and
    /// fragment dropped, dot segments removed, index file appended to
    /// directory targets.
    pub fn request_key(&self, target: &str) -> Option<String> {
        if !target.starts_with('/') {
            return None;
        }
        let url = Url::parse(&format!("http://localhost{target}")).ok()?;
        let mut key = percent_decode_str(url.path())
            .decode_utf8()
            .ok()?
            .into_owned();

        if key.ends_with('/') {
            key.push_str(&self.index_file);
        }
        Some(key)
    }
}
