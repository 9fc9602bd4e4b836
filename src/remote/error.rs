//! Enumeration errors

use crate::gcp::http::ApiError;
use thiserror::Error;

/// Listing of one resource kind failed
///
/// `resource_type` is the kind being enumerated, `listed_type` the kind whose
/// listing actually failed. They differ when an enumerator depends on another
/// listing, e.g. bucket IAM members need the bucket list first.
#[derive(Debug, Error)]
#[error("error listing {listed_type} for {resource_type}: {source}")]
pub struct ListingError {
    pub resource_type: String,
    pub listed_type: String,
    #[source]
    pub source: ApiError,
}

impl ListingError {
    /// Failure listing the enumerated kind itself
    pub fn new(resource_type: &str, source: ApiError) -> Self {
        Self::with_listed_type(resource_type, resource_type, source)
    }

    pub fn with_listed_type(resource_type: &str, listed_type: &str, source: ApiError) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            listed_type: listed_type.to_string(),
            source,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        self.source.is_access_denied()
    }
}

/// Deep-mode detail read failed
#[derive(Debug, Error)]
pub enum DetailsError {
    #[error("reading details of {resource_type}.{id}: {source}")]
    Api {
        resource_type: String,
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("{resource_type}.{id} no longer exists")]
    NotFound { resource_type: String, id: String },
}
