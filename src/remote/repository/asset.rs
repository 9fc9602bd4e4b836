//! Inventory Repository
//!
//! Two broad Cloud Asset listings back every per-kind query:
//! `searchAllResources` for kinds whose id can be rebuilt from the search
//! result, and `assets.list` for kinds whose id lives in the provider
//! payload. Each listing is drained once per scope per scan and kept in the
//! cache; per-kind calls filter the snapshot.

use crate::cache::Cache;
use crate::gcp::client::AssetClient;
use crate::gcp::http::ApiError;
use crate::gcp::model::{Asset, ResourceSearchResult};
use crate::gcp::paging;
use async_trait::async_trait;
use std::sync::Arc;

pub const STORAGE_BUCKET_ASSET_TYPE: &str = "storage.googleapis.com/Bucket";
pub const COMPUTE_FIREWALL_ASSET_TYPE: &str = "compute.googleapis.com/Firewall";
pub const COMPUTE_ROUTER_ASSET_TYPE: &str = "compute.googleapis.com/Router";
pub const COMPUTE_INSTANCE_ASSET_TYPE: &str = "compute.googleapis.com/Instance";
pub const COMPUTE_NETWORK_ASSET_TYPE: &str = "compute.googleapis.com/Network";
pub const COMPUTE_SUBNETWORK_ASSET_TYPE: &str = "compute.googleapis.com/Subnetwork";
pub const COMPUTE_DISK_ASSET_TYPE: &str = "compute.googleapis.com/Disk";
pub const COMPUTE_IMAGE_ASSET_TYPE: &str = "compute.googleapis.com/Image";
pub const DNS_MANAGED_ZONE_ASSET_TYPE: &str = "dns.googleapis.com/ManagedZone";
pub const COMPUTE_INSTANCE_GROUP_ASSET_TYPE: &str = "compute.googleapis.com/InstanceGroup";
pub const BIGQUERY_DATASET_ASSET_TYPE: &str = "bigquery.googleapis.com/Dataset";
pub const BIGQUERY_TABLE_ASSET_TYPE: &str = "bigquery.googleapis.com/Table";
pub const COMPUTE_ADDRESS_ASSET_TYPE: &str = "compute.googleapis.com/Address";
pub const COMPUTE_HEALTH_CHECK_ASSET_TYPE: &str = "compute.googleapis.com/HealthCheck";
pub const CLOUD_RUN_SERVICE_ASSET_TYPE: &str = "run.googleapis.com/Service";
pub const KMS_CRYPTO_KEY_ASSET_TYPE: &str = "cloudkms.googleapis.com/CryptoKey";

pub const COMPUTE_GLOBAL_ADDRESS_ASSET_TYPE: &str = "compute.googleapis.com/GlobalAddress";
pub const CLOUD_FUNCTIONS_FUNCTION_ASSET_TYPE: &str = "cloudfunctions.googleapis.com/CloudFunction";
pub const BIGTABLE_INSTANCE_ASSET_TYPE: &str = "bigtableadmin.googleapis.com/Instance";
pub const BIGTABLE_TABLE_ASSET_TYPE: &str = "bigtableadmin.googleapis.com/Table";
pub const SQL_DATABASE_INSTANCE_ASSET_TYPE: &str = "sqladmin.googleapis.com/Instance";
pub const COMPUTE_NODE_GROUP_ASSET_TYPE: &str = "compute.googleapis.com/NodeGroup";
pub const COMPUTE_FORWARDING_RULE_ASSET_TYPE: &str = "compute.googleapis.com/ForwardingRule";
pub const COMPUTE_INSTANCE_GROUP_MANAGER_ASSET_TYPE: &str =
    "compute.googleapis.com/InstanceGroupManager";
pub const COMPUTE_GLOBAL_FORWARDING_RULE_ASSET_TYPE: &str =
    "compute.googleapis.com/GlobalForwardingRule";
pub const COMPUTE_SSL_CERTIFICATE_ASSET_TYPE: &str = "compute.googleapis.com/SslCertificate";

/// Asset types requested by the `searchAllResources` listing
pub const SEARCH_ASSET_TYPES: &[&str] = &[
    STORAGE_BUCKET_ASSET_TYPE,
    COMPUTE_FIREWALL_ASSET_TYPE,
    COMPUTE_ROUTER_ASSET_TYPE,
    COMPUTE_INSTANCE_ASSET_TYPE,
    COMPUTE_NETWORK_ASSET_TYPE,
    COMPUTE_SUBNETWORK_ASSET_TYPE,
    DNS_MANAGED_ZONE_ASSET_TYPE,
    COMPUTE_INSTANCE_GROUP_ASSET_TYPE,
    BIGQUERY_DATASET_ASSET_TYPE,
    BIGQUERY_TABLE_ASSET_TYPE,
    COMPUTE_ADDRESS_ASSET_TYPE,
    COMPUTE_DISK_ASSET_TYPE,
    COMPUTE_IMAGE_ASSET_TYPE,
    COMPUTE_HEALTH_CHECK_ASSET_TYPE,
    CLOUD_RUN_SERVICE_ASSET_TYPE,
    KMS_CRYPTO_KEY_ASSET_TYPE,
];

/// Asset types requested by the `assets.list` listing
pub const LIST_ASSET_TYPES: &[&str] = &[
    CLOUD_FUNCTIONS_FUNCTION_ASSET_TYPE,
    BIGTABLE_INSTANCE_ASSET_TYPE,
    BIGTABLE_TABLE_ASSET_TYPE,
    SQL_DATABASE_INSTANCE_ASSET_TYPE,
    COMPUTE_GLOBAL_ADDRESS_ASSET_TYPE,
    COMPUTE_NODE_GROUP_ASSET_TYPE,
    COMPUTE_FORWARDING_RULE_ASSET_TYPE,
    COMPUTE_INSTANCE_GROUP_MANAGER_ASSET_TYPE,
    COMPUTE_GLOBAL_FORWARDING_RULE_ASSET_TYPE,
    COMPUTE_SSL_CERTIFICATE_ASSET_TYPE,
];

/// Per-kind view of the Cloud Asset inventory
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Search results of one asset type
    async fn search_all_resources(
        &self,
        asset_type: &str,
    ) -> Result<Vec<ResourceSearchResult>, ApiError>;

    /// Listed assets of one asset type
    async fn list_all_resources(&self, asset_type: &str) -> Result<Vec<Asset>, ApiError>;

    async fn search_all_buckets(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(STORAGE_BUCKET_ASSET_TYPE).await
    }

    async fn search_all_firewalls(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_FIREWALL_ASSET_TYPE).await
    }

    async fn search_all_routers(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_ROUTER_ASSET_TYPE).await
    }

    async fn search_all_instances(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_INSTANCE_ASSET_TYPE).await
    }

    async fn search_all_networks(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_NETWORK_ASSET_TYPE).await
    }

    async fn search_all_subnetworks(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_SUBNETWORK_ASSET_TYPE).await
    }

    async fn search_all_disks(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_DISK_ASSET_TYPE).await
    }

    async fn search_all_images(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_IMAGE_ASSET_TYPE).await
    }

    async fn search_all_dns_managed_zones(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(DNS_MANAGED_ZONE_ASSET_TYPE).await
    }

    async fn search_all_instance_groups(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_INSTANCE_GROUP_ASSET_TYPE).await
    }

    async fn search_all_datasets(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(BIGQUERY_DATASET_ASSET_TYPE).await
    }

    async fn search_all_tables(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(BIGQUERY_TABLE_ASSET_TYPE).await
    }

    async fn search_all_addresses(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_ADDRESS_ASSET_TYPE).await
    }

    async fn search_all_health_checks(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(COMPUTE_HEALTH_CHECK_ASSET_TYPE).await
    }

    async fn search_all_cloud_run_services(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(CLOUD_RUN_SERVICE_ASSET_TYPE).await
    }

    async fn search_all_kms_crypto_keys(&self) -> Result<Vec<ResourceSearchResult>, ApiError> {
        self.search_all_resources(KMS_CRYPTO_KEY_ASSET_TYPE).await
    }

    async fn search_all_global_addresses(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(COMPUTE_GLOBAL_ADDRESS_ASSET_TYPE).await
    }

    async fn search_all_functions(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(CLOUD_FUNCTIONS_FUNCTION_ASSET_TYPE).await
    }

    async fn search_all_bigtable_instances(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(BIGTABLE_INSTANCE_ASSET_TYPE).await
    }

    async fn search_all_bigtable_tables(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(BIGTABLE_TABLE_ASSET_TYPE).await
    }

    async fn search_all_sql_database_instances(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(SQL_DATABASE_INSTANCE_ASSET_TYPE).await
    }

    async fn search_all_node_groups(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(COMPUTE_NODE_GROUP_ASSET_TYPE).await
    }

    async fn search_all_forwarding_rules(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(COMPUTE_FORWARDING_RULE_ASSET_TYPE).await
    }

    async fn search_all_instance_group_managers(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(COMPUTE_INSTANCE_GROUP_MANAGER_ASSET_TYPE).await
    }

    async fn search_all_global_forwarding_rules(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(COMPUTE_GLOBAL_FORWARDING_RULE_ASSET_TYPE).await
    }

    async fn search_all_ssl_certificates(&self) -> Result<Vec<Asset>, ApiError> {
        self.list_all_resources(COMPUTE_SSL_CERTIFICATE_ASSET_TYPE).await
    }
}

/// [`AssetRepository`] over the Cloud Asset API
pub struct GcpAssetRepository {
    client: Arc<dyn AssetClient>,
    scopes: Vec<String>,
    cache: Arc<Cache>,
}

impl GcpAssetRepository {
    /// `scopes` are `projects/<id>`, `folders/<id>` or `organizations/<id>`
    pub fn new(client: Arc<dyn AssetClient>, scopes: Vec<String>, cache: Arc<Cache>) -> Self {
        Self { client, scopes, cache }
    }

    /// Full search snapshot of one scope, drained at most once per scan
    async fn search_snapshot(
        &self,
        scope: &str,
    ) -> Result<Arc<Vec<ResourceSearchResult>>, ApiError> {
        let entry = self.cache.get_and_lock(&format!("search_all_resources_{}", scope)).await;
        if let Some(hit) = entry.value::<Vec<ResourceSearchResult>>() {
            tracing::debug!("cache hit: {}", entry.key());
            return Ok(hit);
        }

        tracing::debug!("cache miss: {}, searching all resources", entry.key());
        let client = &self.client;
        let results = paging::drain(|token| async move {
            client
                .search_all_resources(scope, SEARCH_ASSET_TYPES, token.as_deref())
                .await
        })
        .await?;

        let results = Arc::new(results);
        entry.put(Arc::clone(&results));
        Ok(results)
    }

    /// Full `assets.list` snapshot of one scope, drained at most once per scan
    async fn list_snapshot(&self, scope: &str) -> Result<Arc<Vec<Asset>>, ApiError> {
        let entry = self.cache.get_and_lock(&format!("list_all_resources_{}", scope)).await;
        if let Some(hit) = entry.value::<Vec<Asset>>() {
            tracing::debug!("cache hit: {}", entry.key());
            return Ok(hit);
        }

        tracing::debug!("cache miss: {}, listing all assets", entry.key());
        let client = &self.client;
        let assets = paging::drain(|token| async move {
            client.list_assets(scope, LIST_ASSET_TYPES, token.as_deref()).await
        })
        .await?;

        let assets = Arc::new(assets);
        entry.put(Arc::clone(&assets));
        Ok(assets)
    }
}

#[async_trait]
impl AssetRepository for GcpAssetRepository {
    async fn search_all_resources(
        &self,
        asset_type: &str,
    ) -> Result<Vec<ResourceSearchResult>, ApiError> {
        let mut results = Vec::new();
        for scope in &self.scopes {
            let snapshot = self.search_snapshot(scope).await?;
            results.extend(snapshot.iter().filter(|r| r.asset_type == asset_type).cloned());
        }
        Ok(results)
    }

    async fn list_all_resources(&self, asset_type: &str) -> Result<Vec<Asset>, ApiError> {
        let mut assets = Vec::new();
        for scope in &self.scopes {
            let snapshot = self.list_snapshot(scope).await?;
            assets.extend(snapshot.iter().filter(|a| a.asset_type == asset_type).cloned());
        }
        Ok(assets)
    }
}
