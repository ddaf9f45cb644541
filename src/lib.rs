//! # docsync - Document Browser with Upload Sync
//!
//! docsync serves a directory of documents over HTTP (browse folders,
//! download files) and makes a target folder under the document root match
//! an uploaded directory tree, either by replacing it wholesale or by an
//! incremental copy/delete/prune pass.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docsync::{ExclusionFilter, SyncEngine, SyncPolicy};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let filter = Arc::new(ExclusionFilter::with_defaults()?);
//!     let engine = SyncEngine::new("/config/docs", filter);
//!     let report = engine.sync("./upload".as_ref(), "manuals", SyncPolicy::Incremental)?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Running the Server
//!
//! ```rust,ignore
//! use docsync::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     config.validate()?;
//!     docsync::server::serve(config).await
//! }
//! ```

pub mod config;
pub mod delete;
pub mod error;
pub mod exclusion;
pub mod listing;
pub mod logging;
pub mod server;
pub mod staging;
pub mod strategies;
pub mod sync;
pub mod types;
pub mod utils;
pub mod validation;
pub mod walker;

// Re-export commonly used types and functions
pub use config::Config;
pub use error::{ConfigError, ListError, StagingError, SyncError};
pub use exclusion::ExclusionFilter;
pub use listing::{DirectoryLister, FolderListing};
pub use strategies::SyncPolicy;
pub use sync::SyncEngine;
pub use types::{FileInfo, OperationReport};

// vim: ts=4
