//! Cloud Functions enumerators

use super::from_data_names;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::GOOGLE_CLOUDFUNCTIONS_FUNCTION;
use crate::resource::{AbstractResource, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct FunctionEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl FunctionEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for FunctionEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_CLOUDFUNCTIONS_FUNCTION
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let functions = self
            .repository
            .search_all_functions()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_data_names(self.factory.as_ref(), self.supported_type(), &functions))
    }
}
