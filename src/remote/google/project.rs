//! Project IAM enumerators
//!
//! Both read the same project policies. The member variant emits one
//! resource per (project, role, member), the binding variant one per
//! (project, role) carrying the member list.

use super::identity;
use crate::remote::error::ListingError;
use crate::remote::repository::CloudResourceManagerRepository;
use crate::remote::Enumerator;
use crate::resource::types::{GOOGLE_PROJECT_IAM_BINDING, GOOGLE_PROJECT_IAM_MEMBER};
use crate::resource::{AbstractResource, Attributes, ResourceFactory};
use async_trait::async_trait;
use std::sync::Arc;

pub struct IamMemberEnumerator {
    repository: Arc<dyn CloudResourceManagerRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl IamMemberEnumerator {
    pub fn new(
        repository: Arc<dyn CloudResourceManagerRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for IamMemberEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_PROJECT_IAM_MEMBER
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let projects = self
            .repository
            .list_projects_bindings()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::new();
        for (project, bindings) in &projects {
            for (role, members) in bindings {
                for member in members {
                    let mut attrs = Attributes::new();
                    attrs.insert("project", project.as_str());
                    attrs.insert("role", role.as_str());
                    attrs.insert("member", member.as_str());
                    results.push(self.factory.create_abstract_resource(
                        self.supported_type(),
                        &identity::project_iam_member_id(project, role, member),
                        attrs,
                    ));
                }
            }
        }
        Ok(results)
    }
}

pub struct IamBindingEnumerator {
    repository: Arc<dyn CloudResourceManagerRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl IamBindingEnumerator {
    pub fn new(
        repository: Arc<dyn CloudResourceManagerRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self { repository, factory }
    }
}

#[async_trait]
impl Enumerator for IamBindingEnumerator {
    fn supported_type(&self) -> &'static str {
        GOOGLE_PROJECT_IAM_BINDING
    }

    async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
        let projects = self
            .repository
            .list_projects_bindings()
            .await
            .map_err(|e| ListingError::new(self.supported_type(), e))?;

        let mut results = Vec::new();
        for (project, bindings) in projects {
            for (role, members) in bindings {
                let id = identity::project_iam_binding_id(&project, &role);
                let mut attrs = Attributes::new();
                attrs.insert("project", project.as_str());
                attrs.insert("role", role);
                attrs.insert("members", members);
                results.push(
                    self.factory
                        .create_abstract_resource(self.supported_type(), &id, attrs),
                );
            }
        }
        Ok(results)
    }
}
