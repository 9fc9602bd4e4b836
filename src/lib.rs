//! Google Cloud inventory enumeration
//!
//! Lists live GCP resources through the Cloud Asset Inventory and IAM policy
//! APIs and turns them into identity-stable records whose `(type, id)` pairs
//! match the ids Terraform assigns to the same objects.
//!
//! # Module Structure
//!
//! - [`cache`] - Per-scan single-flight cache shared by repositories
//! - [`gcp`] - Authentication, HTTP plumbing and REST clients
//! - [`remote`] - Repositories, per-type enumerators and the scan driver
//! - [`resource`] - The canonical [`resource::AbstractResource`] record
//! - [`schema`] - Per-type normalization hooks and deep-mode flags
//! - [`config`] - Persistent and environment-derived configuration
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gcp_inventory::{cache::Cache, config::Config, gcp::client::GcpClient, remote, schema};
//!
//! async fn scan() -> anyhow::Result<()> {
//!     let config = Config::load();
//!     let client = Arc::new(GcpClient::new().await?);
//!     let library = remote::google::init(
//!         remote::google::Clients::from_client(client),
//!         &config,
//!         Arc::new(Cache::new(100)),
//!     );
//!
//!     let mut schemas = schema::SchemaRepository::new();
//!     schema::google::init_resources_metadata(&mut schemas);
//!
//!     let result = remote::Scanner::new(library, Arc::new(schemas), Default::default())
//!         .resources()
//!         .await?;
//!     println!("{} resources", result.resources.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod gcp;
pub mod remote;
pub mod resource;
pub mod schema;
