//! Project IAM policy repository

use super::{fold_policy, Bindings};
use crate::cache::Cache;
use crate::gcp::client::ResourceManagerClient;
use crate::gcp::http::ApiError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

#[async_trait]
pub trait CloudResourceManagerRepository: Send + Sync {
    /// Bindings of every configured project, keyed by project id
    async fn list_projects_bindings(&self) -> Result<BTreeMap<String, Bindings>, ApiError>;
}

pub struct GcpCloudResourceManagerRepository {
    client: Arc<dyn ResourceManagerClient>,
    projects: Vec<String>,
    cache: Arc<Cache>,
}

impl GcpCloudResourceManagerRepository {
    pub fn new(
        client: Arc<dyn ResourceManagerClient>,
        projects: Vec<String>,
        cache: Arc<Cache>,
    ) -> Self {
        Self { client, projects, cache }
    }

    async fn project_bindings(&self, project: &str) -> Result<Arc<Bindings>, ApiError> {
        let entry = self.cache.get_and_lock(&format!("project_bindings_{}", project)).await;
        if let Some(hit) = entry.value::<Bindings>() {
            return Ok(hit);
        }

        tracing::debug!("Reading IAM policy of project {}", project);
        let policy = self.client.get_project_iam_policy(project).await?;
        let bindings = Arc::new(fold_policy(&policy));
        entry.put(Arc::clone(&bindings));
        Ok(bindings)
    }
}

#[async_trait]
impl CloudResourceManagerRepository for GcpCloudResourceManagerRepository {
    async fn list_projects_bindings(&self) -> Result<BTreeMap<String, Bindings>, ApiError> {
        let mut all = BTreeMap::new();
        for project in &self.projects {
            let bindings = self.project_bindings(project).await?;
            all.insert(project.clone(), Bindings::clone(&bindings));
        }
        Ok(all)
    }
}
