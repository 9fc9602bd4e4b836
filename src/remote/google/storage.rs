//! Cloud Storage enumerators

use super::identity;
use crate::remote::error::ListingError;
use crate::remote::repository::{AssetRepository, Bindings, StorageRepository};
use crate::remote::Enumerator;
use crate::resource::types::{
    GOOGLE_STORAGE_BUCKET, GOOGLE_STORAGE_BUCKET_IAM_BINDING, GOOGLE_STORAGE_BUCKET_IAM_MEMBER,
};
use crate::resource::{AbstractResource, Attributes, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct StorageBucketEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl StorageBucketEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for StorageBucketEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_STORAGE_BUCKET
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let buckets = self
            .repository
            .search_all_buckets()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        Ok(buckets
            .iter()
            .filter(|b| {
                if b.display_name.is_empty() {
                    tracing::warn!("Skipping bucket without display name: {}", b.name);
                    return false;
                }
                true
            })
            .map(|b| {
                let mut attrs = Attributes::new();
                attrs.insert("name", b.display_name.as_str());
                if !b.location.is_empty() {
                    attrs.insert("location", b.location.to_uppercase());
                }
                self.factory
                    .create_abstract_resource(self.supported_type(), &b.display_name, attrs)
            })
            .collect())
    }
}

/// Bindings of every bucket, in bucket listing order
///
/// A bucket listing failure is reported against `google_storage_bucket`, a
/// policy read failure against `ty`.
async fn bucket_bindings(
    assets: &dyn AssetRepository,
    storage: &dyn StorageRepository,
    ty: &str,
) -> Result<Vec<(String, Bindings)>, ListingError> {
    let buckets = assets
        .search_all_buckets()
        .await
        .map_err(|e| ListingError::with_listed_type(ty, GOOGLE_STORAGE_BUCKET, e))?;

    let mut all = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        if bucket.display_name.is_empty() {
            tracing::warn!("Bucket {} has no name, skipping its {} bindings", bucket.name, ty);
            continue;
        }
        let bindings = storage
            .list_all_bindings(&bucket.display_name)
            .await
            .map_err(|e| ListingError::new(ty, e))?;
        all.push((bucket.display_name, bindings));
    }
    Ok(all)
}

/// One `google_storage_bucket_iam_member` per (bucket, role, member)
pub struct StorageBucketIamMemberEnumerator {
    assets: Arc<dyn AssetRepository>,
    storage: Arc<dyn StorageRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl StorageBucketIamMemberEnumerator {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        storage: Arc<dyn StorageRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            assets,
            storage,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for StorageBucketIamMemberEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_STORAGE_BUCKET_IAM_MEMBER
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let ty = self.supported_type();
        let mut results = Vec::new();

        let buckets = bucket_bindings(self.assets.as_ref(), self.storage.as_ref(), ty).await?;
        for (bucket, bindings) in buckets {
            for (role, members) in &bindings {
                for member in members {
                    let mut attrs = Attributes::new();
                    attrs.insert("bucket", format!("b/{}", bucket));
                    attrs.insert("role", role.as_str());
                    attrs.insert("member", member.as_str());
                    results.push(self.factory.create_abstract_resource(
                        ty,
                        &identity::bucket_iam_member_id(&bucket, role, member),
                        attrs,
                    ));
                }
            }
        }

        Ok(results)
    }
}

/// One `google_storage_bucket_iam_binding` per (bucket, role)
pub struct StorageBucketIamBindingEnumerator {
    assets: Arc<dyn AssetRepository>,
    storage: Arc<dyn StorageRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl StorageBucketIamBindingEnumerator {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        storage: Arc<dyn StorageRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            assets,
            storage,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for StorageBucketIamBindingEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_STORAGE_BUCKET_IAM_BINDING
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let ty = self.supported_type();
        let mut results = Vec::new();

        let buckets = bucket_bindings(self.assets.as_ref(), self.storage.as_ref(), ty).await?;
        for (bucket, bindings) in buckets {
            for (role, members) in bindings {
                let mut attrs = Attributes::new();
                attrs.insert("bucket", format!("b/{}", bucket));
                attrs.insert("role", role.as_str());
                let id = identity::bucket_iam_binding_id(&bucket, &role);
                attrs.insert("members", members);
                results.push(self.factory.create_abstract_resource(ty, &id, attrs));
            }
        }

        Ok(results)
    }
}
