//! Cloud Run enumerators

use super::identity;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::GOOGLE_CLOUD_RUN_SERVICE;
use crate::resource::{AbstractResource, Attributes, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct ServiceEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ServiceEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for ServiceEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_CLOUD_RUN_SERVICE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let services = self
            .repository
            .search_all_cloud_run_services()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(services.len());
        for service in &services {
            let Some(id) = identity::cloud_run_service_id(&service.name) else {
                tracing::warn!("Unexpected Cloud Run service name: {}, skipping", service.name);
                continue;
            };
            let mut attrs = Attributes::new();
            attrs.insert("name", service.display_name.as_str());
            if !service.location.is_empty() {
                attrs.insert("location", service.location.as_str());
            }
            results.push(self.factory.create_abstract_resource(self.supported_type(), &id, attrs));
        }
        Ok(results)
    }
}
