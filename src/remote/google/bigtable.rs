//! Bigtable enumerators

use super::from_data_names;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::{GOOGLE_BIGTABLE_INSTANCE, GOOGLE_BIGTABLE_TABLE};
use crate::resource::{AbstractResource, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct InstanceEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl InstanceEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for InstanceEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_BIGTABLE_INSTANCE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let instances = self
            .repository
            .search_all_bigtable_instances()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_data_names(self.factory.as_ref(), self.supported_type(), &instances))
    }
}

pub struct TableEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl TableEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for TableEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_BIGTABLE_TABLE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let tables = self
            .repository
            .search_all_bigtable_tables()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_data_names(self.factory.as_ref(), self.supported_type(), &tables))
    }
}
