//! dotforge - declarative development environment configuration
//!
//! Components declare how their configuration files should look (env vars,
//! aliases, rendered tool profiles, synced dotfiles); dotforge materializes
//! those declarations onto disk as symlinks, copies, or merged documents,
//! idempotently and without clobbering user edits.

pub mod bundle;
pub mod commands;
pub mod error;
pub mod generate;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod schema;
pub mod syncer;
pub mod writers;

pub use error::Error;
pub use generate::{GeneratedFile, Generator};
pub use loader::Loader;
pub use schema::{ComponentConfig, FileSpec, SyncFileSpec, SyncMode};
pub use syncer::{SyncReport, Syncer};
