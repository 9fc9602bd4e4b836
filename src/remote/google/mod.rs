//! Google Cloud enumerators
//!
//! One [`Enumerator`](super::Enumerator) per Terraform resource kind. All of
//! them read through the repositories built by [`init`], which share one
//! [`Cache`] per scan.

pub mod bigquery;
pub mod bigtable;
pub mod cloudfunctions;
pub mod cloudrun;
pub mod compute;
pub mod dns;
pub mod identity;
pub mod kms;
pub mod project;
pub mod sql;
pub mod storage;

use super::repository::{
    AssetRepository, CloudResourceManagerRepository, GcpAssetRepository,
    GcpCloudResourceManagerRepository, GcpStorageRepository, StorageRepository,
};
use super::{Enumerator, RemoteLibrary};
use crate::cache::Cache;
use crate::config::Config;
use crate::gcp::client::{AssetClient, GcpClient, ResourceManagerClient, StorageClient};
use crate::gcp::model::{Asset, ResourceSearchResult};
use crate::resource::{AbstractResource, Attributes, ResourceFactory, TerraformResourceFactory};
use std::sync::Arc;

/// Upstream clients the repositories are built on
#[derive(Clone)]
pub struct Clients {
    pub asset: Arc<dyn AssetClient>,
    pub resource_manager: Arc<dyn ResourceManagerClient>,
    pub storage: Arc<dyn StorageClient>,
}

impl Clients {
    /// Route every API through one REST client
    pub fn from_client(client: Arc<GcpClient>) -> Self {
        Self {
            asset: client.clone(),
            resource_manager: client.clone(),
            storage: client,
        }
    }
}

/// Build the repositories and register every Google enumerator
pub fn init(clients: Clients, config: &Config, cache: Arc<Cache>) -> RemoteLibrary {
    let f: Arc<dyn ResourceFactory> = Arc::new(TerraformResourceFactory);

    let a: Arc<dyn AssetRepository> = Arc::new(GcpAssetRepository::new(
        clients.asset,
        config.scan_scopes(),
        cache.clone(),
    ));
    let storage: Arc<dyn StorageRepository> =
        Arc::new(GcpStorageRepository::new(clients.storage, cache.clone()));
    let iam: Arc<dyn CloudResourceManagerRepository> =
        Arc::new(GcpCloudResourceManagerRepository::new(
            clients.resource_manager,
            config.scan_projects(),
            cache,
        ));

    let enumerators: Vec<Arc<dyn Enumerator>> = vec![
        Arc::new(storage::StorageBucketEnumerator::new(a.clone(), f.clone())),
        Arc::new(storage::StorageBucketIamMemberEnumerator::new(
            a.clone(),
            storage.clone(),
            f.clone(),
        )),
        Arc::new(storage::StorageBucketIamBindingEnumerator::new(
            a.clone(),
            storage,
            f.clone(),
        )),
        Arc::new(compute::FirewallEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::RouterEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::InstanceEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::NetworkEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::SubnetworkEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::InstanceGroupEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::AddressEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::GlobalAddressEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::DiskEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::ImageEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::HealthCheckEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::NodeGroupEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::ForwardingRuleEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::InstanceGroupManagerEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::GlobalForwardingRuleEnumerator::new(a.clone(), f.clone())),
        Arc::new(compute::SslCertificateEnumerator::new(a.clone(), f.clone())),
        Arc::new(dns::ManagedZoneEnumerator::new(a.clone(), f.clone())),
        Arc::new(bigquery::DatasetEnumerator::new(a.clone(), f.clone())),
        Arc::new(bigquery::TableEnumerator::new(a.clone(), f.clone())),
        Arc::new(bigtable::InstanceEnumerator::new(a.clone(), f.clone())),
        Arc::new(bigtable::TableEnumerator::new(a.clone(), f.clone())),
        Arc::new(sql::DatabaseInstanceEnumerator::new(a.clone(), f.clone())),
        Arc::new(cloudfunctions::FunctionEnumerator::new(a.clone(), f.clone())),
        Arc::new(cloudrun::ServiceEnumerator::new(a.clone(), f.clone())),
        Arc::new(kms::CryptoKeyEnumerator::new(a, f.clone())),
        Arc::new(project::IamMemberEnumerator::new(iam.clone(), f.clone())),
        Arc::new(project::IamBindingEnumerator::new(iam, f)),
    ];

    let mut library = RemoteLibrary::new();
    for enumerator in enumerators {
        library.add_enumerator(enumerator);
    }
    library
}

// =============================================================================
// Shared record conversions
// =============================================================================

fn name_attributes(display_name: &str) -> Attributes {
    let mut attrs = Attributes::new();
    if !display_name.is_empty() {
        attrs.insert("name", display_name);
    }
    attrs
}

/// One resource per search result, id = trimmed full resource name
pub(crate) fn from_trimmed_search_names(
    factory: &dyn ResourceFactory,
    ty: &str,
    results: &[ResourceSearchResult],
) -> Vec<AbstractResource> {
    results
        .iter()
        .filter_map(|res| {
            let id = identity::trim_resource_name(&res.name);
            if id.is_empty() {
                tracing::warn!("Skipping {} with empty name", ty);
                return None;
            }
            Some(factory.create_abstract_resource(ty, id, name_attributes(&res.display_name)))
        })
        .collect()
}

/// One resource per listed asset, id = trimmed asset name
pub(crate) fn from_trimmed_asset_names(
    factory: &dyn ResourceFactory,
    ty: &str,
    assets: &[Asset],
) -> Vec<AbstractResource> {
    assets
        .iter()
        .filter_map(|asset| {
            let id = identity::trim_resource_name(&asset.name);
            if id.is_empty() {
                tracing::warn!("Skipping {} with empty name", ty);
                return None;
            }
            let mut attrs = Attributes::new();
            if let Some(name) = asset.data_str("name") {
                attrs.insert("name", name);
            }
            Some(factory.create_abstract_resource(ty, id, attrs))
        })
        .collect()
}

/// One resource per listed asset, id = `resource.data.name`
///
/// Assets without a usable `name` in their payload are skipped.
pub(crate) fn from_data_names(
    factory: &dyn ResourceFactory,
    ty: &str,
    assets: &[Asset],
) -> Vec<AbstractResource> {
    assets
        .iter()
        .filter_map(|asset| {
            let Some(name) = asset.data_str("name") else {
                tracing::warn!("Cannot find name for {} asset {}, skipping", ty, asset.name);
                return None;
            };
            Some(factory.create_abstract_resource(ty, name, name_attributes(name)))
        })
        .collect()
}
