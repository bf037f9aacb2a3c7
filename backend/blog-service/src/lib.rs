/// Blog Service Library
///
/// The Quill blogging platform backend: authors write posts, file them into
/// groups, comment, and follow each other for a personalized feed. The
/// service validates externally issued identity tokens, composes paginated
/// feeds, and enforces ownership rules on every mutation.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Data structures for users, groups, posts, comments, follows
/// - `services`: Feed composer, authorization policy, mutation services
/// - `db`: Repository traits, PostgreSQL implementations, schema bootstrap
/// - `middleware`: Identity resolution from bearer tokens
/// - `auth`: Token encoding/decoding and the `Identity` type
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors and the `/metrics` handler
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
