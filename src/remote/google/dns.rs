//! Cloud DNS enumerators

use super::identity;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::GOOGLE_DNS_MANAGED_ZONE;
use crate::resource::{AbstractResource, Attributes, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct ManagedZoneEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ManagedZoneEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for ManagedZoneEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_DNS_MANAGED_ZONE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let zones = self
            .repository
            .search_all_dns_managed_zones()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(zones.len());
        for zone in &zones {
            let Some(id) = identity::dns_managed_zone_id(&zone.name, &zone.display_name) else {
                tracing::warn!("Unexpected managed zone name: {}, skipping", zone.name);
                continue;
            };
            let mut attrs = Attributes::new();
            attrs.insert("name", zone.display_name.as_str());
            results.push(self.factory.create_abstract_resource(self.supported_type(), &id, attrs));
        }
        Ok(results)
    }
}
