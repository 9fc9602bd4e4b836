//! Cached access to the upstream APIs
//!
//! Repositories sit between enumerators and the REST clients. They own the
//! per-scan [`Cache`](crate::cache::Cache) so that one expensive listing is
//! shared by every enumerator that needs a slice of it.

pub mod asset;
pub mod resource_manager;
pub mod storage;

pub use asset::{AssetRepository, GcpAssetRepository};
pub use resource_manager::{CloudResourceManagerRepository, GcpCloudResourceManagerRepository};
pub use storage::{GcpStorageRepository, StorageRepository};

use crate::gcp::model::Policy;
use std::collections::BTreeMap;

/// Role to members
pub type Bindings = BTreeMap<String, Vec<String>>;

/// Fold a policy into [`Bindings`]
///
/// Conditional bindings repeat a role; their member lists are merged. Member
/// lists come out sorted and deduplicated.
pub fn fold_policy(policy: &Policy) -> Bindings {
    let mut bindings = Bindings::new();
    for binding in &policy.bindings {
        bindings
            .entry(binding.role.clone())
            .or_default()
            .extend(binding.members.iter().cloned());
    }
    for members in bindings.values_mut() {
        members.sort();
        members.dedup();
    }
    bindings
}
