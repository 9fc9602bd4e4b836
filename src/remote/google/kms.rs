//! Cloud KMS enumerators

use super::from_trimmed_search_names;
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::GOOGLE_KMS_CRYPTO_KEY;
use crate::resource::{AbstractResource, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct CryptoKeyEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl CryptoKeyEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for CryptoKeyEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_KMS_CRYPTO_KEY
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let keys = self
            .repository
            .search_all_kms_crypto_keys()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &keys))
    }
}
