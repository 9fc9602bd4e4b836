//! Remote enumeration
//!
//! # Module Structure
//!
//! - [`repository`] - Cached repositories over the upstream APIs
//! - [`google`] - One [`Enumerator`] per Google resource kind
//! - [`scanner`] - Runs a [`RemoteLibrary`] and collects resources and alerts
//! - [`error`] - Listing and details errors

pub mod error;
pub mod google;
pub mod repository;
pub mod scanner;

pub use error::{DetailsError, ListingError};
pub use scanner::{Alert, ScanResult, Scanner, ScannerOptions};

use crate::resource::AbstractResource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Lists every live resource of one kind
#[async_trait]
pub trait Enumerator: Send + Sync {
    /// Terraform type tag of the produced resources
    fn supported_type(&self) -> &'static str;

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError>;
}

/// Full read of one resource through the provider plugin
///
/// Only used in deep mode, for types whose enumerated attributes are
/// identity-only.
#[async_trait]
pub trait DetailsFetcher: Send + Sync {
    async fn read_details(&self, res: &AbstractResource) -> Result<AbstractResource, DetailsError>;
}

/// Registered enumerators and details fetchers
#[derive(Default, Clone)]
pub struct RemoteLibrary {
    enumerators: Vec<Arc<dyn Enumerator>>,
    details_fetchers: HashMap<&'static str, Arc<dyn DetailsFetcher>>,
}

impl RemoteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_enumerator(&mut self, enumerator: Arc<dyn Enumerator>) {
        self.enumerators.push(enumerator);
    }

    pub fn enumerators(&self) -> &[Arc<dyn Enumerator>] {
        &self.enumerators
    }

    pub fn add_details_fetcher(&mut self, ty: &'static str, fetcher: Arc<dyn DetailsFetcher>) {
        self.details_fetchers.insert(ty, fetcher);
    }

    pub fn details_fetcher(&self, ty: &str) -> Option<&Arc<dyn DetailsFetcher>> {
        self.details_fetchers.get(ty)
    }

    /// Supported types of the registered enumerators, in registration order
    pub fn supported_types(&self) -> Vec<&'static str> {
        self.enumerators.iter().map(|e| e.supported_type()).collect()
    }
}
