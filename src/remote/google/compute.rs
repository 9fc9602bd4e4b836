//! Compute Engine enumerators

use super::{from_trimmed_asset_names, from_trimmed_search_names, identity};
use crate::remote::error::ListingError;
use crate::remote::repository::AssetRepository;
use crate::remote::Enumerator;
use crate::resource::types::*;
use crate::resource::{AbstractResource, Attributes, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct FirewallEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl FirewallEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for FirewallEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_FIREWALL
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let firewalls = self
            .repository
            .search_all_firewalls()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(firewalls.len());
        for firewall in &firewalls {
            let Some((id, project)) = identity::firewall_id(&firewall.name, &firewall.display_name)
            else {
                tracing::warn!("Unexpected firewall name: {}, skipping", firewall.name);
                continue;
            };
            let mut attrs = Attributes::new();
            attrs.insert("name", firewall.display_name.as_str());
            attrs.insert("project", project);
            results.push(self.factory.create_abstract_resource(self.supported_type(), &id, attrs));
        }
        Ok(results)
    }
}

pub struct NetworkEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl NetworkEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for NetworkEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_NETWORK
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let networks = self
            .repository
            .search_all_networks()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(networks.len());
        for network in &networks {
            let Some(id) = identity::network_id(&network.name, &network.display_name) else {
                tracing::warn!("Unexpected network name: {}, skipping", network.name);
                continue;
            };
            let mut attrs = Attributes::new();
            attrs.insert("name", network.display_name.as_str());
            results.push(self.factory.create_abstract_resource(self.supported_type(), &id, attrs));
        }
        Ok(results)
    }
}

pub struct InstanceGroupEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl InstanceGroupEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for InstanceGroupEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_INSTANCE_GROUP
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let groups = self
            .repository
            .search_all_instance_groups()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(groups.len());
        for group in &groups {
            let Some(id) = identity::instance_group_id(&group.name, &group.display_name) else {
                tracing::warn!("Unexpected instance group name: {}, skipping", group.name);
                continue;
            };
            let mut attrs = Attributes::new();
            attrs.insert("name", group.display_name.as_str());
            if !group.location.is_empty() {
                attrs.insert("zone", group.location.as_str());
            }
            results.push(self.factory.create_abstract_resource(self.supported_type(), &id, attrs));
        }
        Ok(results)
    }
}

pub struct AddressEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl AddressEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for AddressEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_ADDRESS
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let addresses = self
            .repository
            .search_all_addresses()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(addresses.len());
        for address in &addresses {
            let id = identity::trim_resource_name(&address.name);
            if id.is_empty() {
                tracing::warn!("Skipping address with empty name");
                continue;
            }
            let mut attrs = Attributes::new();
            if !address.display_name.is_empty() {
                attrs.insert("name", address.display_name.as_str());
            }
            if let Some(ip) = address.additional_attribute("address") {
                attrs.insert("address", ip);
            }
            results.push(self.factory.create_abstract_resource(self.supported_type(), id, attrs));
        }
        Ok(results)
    }
}

pub struct GlobalAddressEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl GlobalAddressEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for GlobalAddressEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_GLOBAL_ADDRESS
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let assets = self
            .repository
            .search_all_global_addresses()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::with_capacity(assets.len());
        for asset in &assets {
            let Some(name) = asset.data_str("name") else {
                tracing::warn!("Cannot find name for global address {}, skipping", asset.name);
                continue;
            };
            let mut attrs = Attributes::new();
            attrs.insert("name", name);
            if let Some(address) = asset.data_str("address") {
                attrs.insert("address", address);
            }
            results.push(self.factory.create_abstract_resource(self.supported_type(), name, attrs));
        }
        Ok(results)
    }
}

pub struct RouterEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl RouterEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for RouterEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_ROUTER
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let routers = self
            .repository
            .search_all_routers()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &routers))
    }
}

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
        GOOGLE_COMPUTE_INSTANCE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let instances = self
            .repository
            .search_all_instances()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &instances))
    }
}

pub struct SubnetworkEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl SubnetworkEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for SubnetworkEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_SUBNETWORK
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let subnetworks = self
            .repository
            .search_all_subnetworks()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &subnetworks))
    }
}

pub struct DiskEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl DiskEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for DiskEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_DISK
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let disks = self
            .repository
            .search_all_disks()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &disks))
    }
}

pub struct ImageEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ImageEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for ImageEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_IMAGE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let images = self
            .repository
            .search_all_images()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &images))
    }
}

pub struct HealthCheckEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl HealthCheckEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for HealthCheckEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_HEALTH_CHECK
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let checks = self
            .repository
            .search_all_health_checks()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_search_names(self.factory.as_ref(), self.supported_type(), &checks))
    }
}

pub struct NodeGroupEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl NodeGroupEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for NodeGroupEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_NODE_GROUP
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let groups = self
            .repository
            .search_all_node_groups()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_asset_names(self.factory.as_ref(), self.supported_type(), &groups))
    }
}

pub struct ForwardingRuleEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ForwardingRuleEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for ForwardingRuleEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_FORWARDING_RULE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let rules = self
            .repository
            .search_all_forwarding_rules()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_asset_names(self.factory.as_ref(), self.supported_type(), &rules))
    }
}

pub struct InstanceGroupManagerEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl InstanceGroupManagerEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for InstanceGroupManagerEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_INSTANCE_GROUP_MANAGER
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let managers = self
            .repository
            .search_all_instance_group_managers()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_asset_names(self.factory.as_ref(), self.supported_type(), &managers))
    }
}

pub struct GlobalForwardingRuleEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl GlobalForwardingRuleEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for GlobalForwardingRuleEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_GLOBAL_FORWARDING_RULE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let rules = self
            .repository
            .search_all_global_forwarding_rules()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_asset_names(self.factory.as_ref(), self.supported_type(), &rules))
    }
}

pub struct SslCertificateEnumerator {
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl SslCertificateEnumerator {
    pub fn new(repository: Arc<dyn AssetRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for SslCertificateEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_COMPUTE_SSL_CERTIFICATE
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let certificates = self
            .repository
            .search_all_ssl_certificates()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;
        Ok(from_trimmed_asset_names(self.factory.as_ref(), self.supported_type(), &certificates))
    }
}
