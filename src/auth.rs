//! HTTP Basic authentication against a plain-text credentials store.
//!
//! The store holds one `username:password` pair per line. It is read on
//! every check, so edits take effect for the next request.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};

const BASIC_PREFIX: &str = "Basic ";

#[derive(Debug, Clone)]
pub struct AuthChecker {
    store: PathBuf,
}

impl AuthChecker {
    pub fn new(store: impl Into<PathBuf>) -> Self {
        Self { store: store.into() }
    }

    pub fn store_path(&self) -> &Path {
        &self.store
    }

    /// Checks an Authorization header value against the store.
    pub async fn check(&self, authorization: Option<&str>) -> bool {
        check_credentials(authorization, &self.store).await
    }
}

/// Returns true when `authorization` carries Basic credentials that match a
/// line of the store at `store`. An unreadable store never matches.
pub async fn check_credentials(authorization: Option<&str>, store: &Path) -> bool {
    let Some((user, pass)) = authorization.and_then(decode_basic) else {
        return false;
    };

    match tokio::fs::read_to_string(store).await {
        Ok(contents) => store_contains(&contents, &user, &pass),
        Err(e) => {
            tracing::warn!(store = %store.display(), error = %e, "Credentials store unreadable");
            false
        }
    }
}

/// Decodes a `Basic <base64>` header value into username and password,
/// split at the first colon and trimmed.
pub fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix(BASIC_PREFIX)?;
    let raw = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(raw).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.trim().to_string(), pass.trim().to_string()))
}

/// Whether any `username:password` line matches exactly.
pub fn store_contains(contents: &str, user: &str, pass: &str) -> bool {
    contents.lines().any(|line| {
        line.split_once(':')
            .is_some_and(|(u, p)| u.trim() == user && p.trim() == pass)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    #[test]
    fn decodes_basic_credentials() {
        assert_eq!(
            decode_basic(&basic("alice:secret")),
            Some(("alice".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn password_may_contain_colons() {
        assert_eq!(
            decode_basic(&basic("bob:a:b")),
            Some(("bob".to_string(), "a:b".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(decode_basic("Bearer abc"), None);
        assert_eq!(decode_basic("Basic !!!not-base64!!!"), None);
        assert_eq!(decode_basic(&basic("no-colon")), None);
    }

    #[test]
    fn store_lines_are_trimmed() {
        let store = "alice:secret\n  bob : hunter2 \r\n";

        assert!(store_contains(store, "alice", "secret"));
        assert!(store_contains(store, "bob", "hunter2"));
        assert!(!store_contains(store, "bob", "secret"));
        assert!(!store_contains(store, "carol", "hunter2"));
    }
}
