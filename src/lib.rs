//! JHTTP - Concurrent static file server
//!
//! Serves files from a sandboxed document root with an in-memory cache,
//! gates one resource behind HTTP Basic authentication and echoes POST
//! bodies back as HTML.

pub mod auth;
pub mod config;
pub mod files;
pub mod http;
pub mod server;
pub mod site;
