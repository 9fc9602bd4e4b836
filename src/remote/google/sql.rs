//! Cloud SQL enumerators

use super::from_data_names;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::GOOGLE_SQL_DATABASE_INSTANCE;
use crate::resource::{AbstractResource, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct DatabaseInstanceEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl DatabaseInstanceEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for DatabaseInstanceEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_SQL_DATABASE_INSTANCE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let instances = self
            .repository
            .search_all_sql_database_instances()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_data_names(self.factory.as_ref(), self.supported_type(), &instances))
    }
}
