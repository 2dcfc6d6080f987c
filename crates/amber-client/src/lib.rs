//! # Amber Client SDK
//!
//! A typed client for the Amber storage-management API: quota and usage,
//! files, trash, exports and storage add-ons.
//!
//! ## Features
//!
//! - **Uniform results**: every operation returns an [`Outcome`], holding
//!   either the decoded data or a [`ClientError`]. Nothing panics and no
//!   call needs error plumbing to be used.
//! - **Checked responses**: success bodies are decoded into typed shapes, a
//!   body that does not match fails as [`ClientError::InvalidResponse`].
//! - **Explicit configuration**: the endpoint and base path come from
//!   [`Config`], so tests can point a client at a fake server.
//!
//! ## Example
//!
//! ```rust,ignore
//! use amber_client::{AmberClient, Config, FilesOptions, SortKey, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AmberClient::new(Config::new("https://amber.example"))?;
//!
//!     let options = FilesOptions::new()
//!         .sort(SortKey::CreatedAt)
//!         .order(SortOrder::Desc)
//!         .limit(20);
//!
//!     match client.get_files(&options).await.into_result() {
//!         Ok(page) => println!("{} of {} files", page.files.len(), page.total),
//!         Err(err) => eprintln!("listing failed: {}", err.message()),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod outcome;
pub mod query;
pub mod transport;
mod types;

pub use client::AmberClient;
pub use config::{Config, DEFAULT_BASE_PATH};
pub use error::{ClientError, ErrorEnvelope, Result, NETWORK_ERROR, REQUEST_FAILED};
pub use outcome::Outcome;
pub use transport::{RequestDescriptor, Transport};
pub use types::*;
