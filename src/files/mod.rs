//! Document root access: target resolution and the shared content cache.

pub mod cache;
pub mod resolver;

pub use cache::ContentCache;
pub use resolver::{PathResolver, Resolved};
