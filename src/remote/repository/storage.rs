//! Bucket IAM policy repository

use super::{fold_policy, Bindings};
use crate::cache::Cache;
use crate::gcp::client::StorageClient;
use crate::gcp::http::ApiError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait StorageRepository: Send + Sync {
    async fn list_all_bindings(&self, bucket: &str) -> Result<Bindings, ApiError>;
}

pub struct GcpStorageRepository {
    client: Arc<dyn StorageClient>,
    cache: Arc<Cache>,
}

impl GcpStorageRepository {
    pub fn new(client: Arc<dyn StorageClient>, cache: Arc<Cache>) -> Self {
        Self { client, cache }
    }
}

#[async_trait]
impl StorageRepository for GcpStorageRepository {
    async fn list_all_bindings(&self, bucket: &str) -> Result<Bindings, ApiError> {
        let entry = self.cache.get_and_lock(&format!("bucket_bindings_{}", bucket)).await;
        if let Some(hit) = entry.value::<Bindings>() {
            return Ok(Bindings::clone(&hit));
        }

        tracing::debug!("Reading IAM policy of bucket {}", bucket);
        let policy = self.client.get_bucket_iam_policy(bucket).await?;
        let bindings = fold_policy(&policy);
        entry.put(Arc::new(bindings.clone()));
        Ok(bindings)
    }
}
