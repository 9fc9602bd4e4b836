//! BigQuery enumerators

use super::from_trimmed_search_names;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::{GOOGLE_BIGQUERY_DATASET, GOOGLE_BIGQUERY_TABLE};
use crate::resource::{AbstractResource, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct DatasetEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl DatasetEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for DatasetEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_BIGQUERY_DATASET
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let datasets = self
            .repository
            .search_all_datasets()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &datasets))
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
        GOOGLE_BIGQUERY_TABLE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let tables = self
            .repository
            .search_all_tables()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &tables))
    }
}
