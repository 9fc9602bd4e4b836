//! GCP Client
//!
//! REST client for the three upstream APIs enumeration reads from. Each API
//! is exposed through a narrow trait so repositories can be driven by
//! in-memory fakes in tests.

use super::auth::{AdcTokenSource, TokenSource};
use super::http::{ApiError, GcpHttpClient};
use super::model::{
    Asset, ListAssetsResponse, Page, Policy, ResourceSearchResult, SearchAllResourcesResponse,
};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use url::Url;

/// Default number of results requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Cloud Asset Inventory
#[async_trait]
pub trait AssetClient: Send + Sync {
    /// One page of `searchAllResources` under `scope`
    async fn search_all_resources(
        &self,
        scope: &str,
        asset_types: &[&str],
        page_token: Option<&str>,
    ) -> Result<Page<ResourceSearchResult>, ApiError>;

    /// One page of `assets.list` (content type `RESOURCE`) under `parent`
    async fn list_assets(
        &self,
        parent: &str,
        asset_types: &[&str],
        page_token: Option<&str>,
    ) -> Result<Page<Asset>, ApiError>;
}

/// Cloud Resource Manager
#[async_trait]
pub trait ResourceManagerClient: Send + Sync {
    async fn get_project_iam_policy(&self, project: &str) -> Result<Policy, ApiError>;
}

/// Cloud Storage
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn get_bucket_iam_policy(&self, bucket: &str) -> Result<Policy, ApiError>;
}

/// API base URLs
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub asset: String,
    pub resource_manager: String,
    pub storage: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            asset: "https://cloudasset.googleapis.com".to_string(),
            resource_manager: "https://cloudresourcemanager.googleapis.com".to_string(),
            storage: "https://storage.googleapis.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Route every API to the same base URL
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            asset: base.clone(),
            resource_manager: base.clone(),
            storage: base,
        }
    }
}

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    tokens: Arc<dyn TokenSource>,
    http: GcpHttpClient,
    endpoints: Endpoints,
    page_size: u32,
}

impl GcpClient {
    /// Client authenticated with Application Default Credentials
    pub async fn new() -> anyhow::Result<Self> {
        let tokens = AdcTokenSource::new()
            .await
            .context("Failed to initialize GCP credentials")?;
        Self::with_token_source(Arc::new(tokens), Endpoints::default())
    }

    pub fn with_token_source(
        tokens: Arc<dyn TokenSource>,
        endpoints: Endpoints,
    ) -> anyhow::Result<Self> {
        let http = GcpHttpClient::new().context("Failed to create HTTP client")?;
        Ok(Self {
            tokens,
            http,
            endpoints,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    fn asset_url(
        &self,
        path: &str,
        asset_types: &[&str],
        page_token: Option<&str>,
        extra: &[(&str, &str)],
    ) -> Result<String, ApiError> {
        let base = format!("{}/v1/{}", self.endpoints.asset, path);
        let mut url = Url::parse(&base)?;

        {
            let mut query = url.query_pairs_mut();
            for asset_type in asset_types {
                query.append_pair("assetTypes", asset_type);
            }
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        Ok(url.to_string())
    }

    pub fn project_iam_policy_url(&self, project: &str) -> String {
        format!(
            "{}/v1/projects/{}:getIamPolicy",
            self.endpoints.resource_manager,
            urlencoding::encode(project)
        )
    }

    pub fn bucket_iam_policy_url(&self, bucket: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/iam",
            self.endpoints.storage,
            urlencoding::encode(bucket)
        )
    }
}

#[async_trait]
impl AssetClient for GcpClient {
    async fn search_all_resources(
        &self,
        scope: &str,
        asset_types: &[&str],
        page_token: Option<&str>,
    ) -> Result<Page<ResourceSearchResult>, ApiError> {
        let url = self.asset_url(
            &format!("{}:searchAllResources", scope),
            asset_types,
            page_token,
            &[],
        )?;
        let token = self.tokens.token().await?;
        let response: SearchAllResourcesResponse = self.http.get(&url, &token).await?;

        Ok(Page {
            items: response.results,
            next_page_token: response.next_page_token,
        })
    }

    async fn list_assets(
        &self,
        parent: &str,
        asset_types: &[&str],
        page_token: Option<&str>,
    ) -> Result<Page<Asset>, ApiError> {
        let url = self.asset_url(
            &format!("{}/assets", parent),
            asset_types,
            page_token,
            &[("contentType", "RESOURCE")],
        )?;
        let token = self.tokens.token().await?;
        let response: ListAssetsResponse = self.http.get(&url, &token).await?;

        Ok(Page {
            items: response.assets,
            next_page_token: response.next_page_token,
        })
    }
}

#[async_trait]
impl ResourceManagerClient for GcpClient {
    async fn get_project_iam_policy(&self, project: &str) -> Result<Policy, ApiError> {
        let url = self.project_iam_policy_url(project);
        let token = self.tokens.token().await?;
        let body = json!({ "options": { "requestedPolicyVersion": 3 } });
        self.http.post(&url, &token, &body).await
    }
}

#[async_trait]
impl StorageClient for GcpClient {
    async fn get_bucket_iam_policy(&self, bucket: &str) -> Result<Policy, ApiError> {
        let url = self.bucket_iam_policy_url(bucket);
        let token = self.tokens.token().await?;
        self.http.get(&url, &token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::auth::StaticToken;

    fn client() -> GcpClient {
        GcpClient::with_token_source(Arc::new(StaticToken("t".into())), Endpoints::default())
            .unwrap()
            .with_page_size(50)
    }

    #[test]
    fn test_search_url_repeats_asset_types() {
        let url = client()
            .asset_url(
                "projects/p:searchAllResources",
                &["compute.googleapis.com/Network", "storage.googleapis.com/Bucket"],
                Some("next"),
                &[],
            )
            .unwrap();

        assert!(
            url.starts_with("https://cloudasset.googleapis.com/v1/projects/p:searchAllResources?")
        );
        assert!(url.contains("assetTypes=compute.googleapis.com%2FNetwork"));
        assert!(url.contains("assetTypes=storage.googleapis.com%2FBucket"));
        assert!(url.contains("pageSize=50"));
        assert!(url.contains("pageToken=next"));
    }

    #[test]
    fn test_bucket_policy_url_encodes_name() {
        let url = client().bucket_iam_policy_url("my bucket");
        assert_eq!(url, "https://storage.googleapis.com/storage/v1/b/my%20bucket/iam");
    }

    #[test]
    fn test_endpoints_with_base_trims_slash() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:8080/");
        assert_eq!(endpoints.asset, "http://127.0.0.1:8080");
        assert_eq!(endpoints.storage, "http://127.0.0.1:8080");
    }
}
