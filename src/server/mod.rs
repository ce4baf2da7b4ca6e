//! Connection acceptance and the bounded worker pool.

pub mod access_log;
pub mod listener;

pub use access_log::ConnectionLog;
pub use listener::{Server, ServerHandle};
