//! Scan driver
//!
//! Runs every registered enumerator with bounded concurrency, turns listing
//! failures into [`Alert`]s so one denied kind never hides the others, and
//! optionally replaces identity-only resources with a full read.

use super::error::{DetailsError, ListingError};
use super::RemoteLibrary;
use crate::resource::{self, AbstractResource};
use crate::schema::SchemaRepository;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

/// Default number of enumerators running at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
pub struct ScannerOptions {
    pub max_concurrency: usize,
    /// Fetch full details of deep-mode types
    pub deep: bool,
    /// Types not to enumerate
    pub ignored_types: HashSet<String>,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            deep: false,
            ignored_types: HashSet::new(),
        }
    }
}

/// A resource kind left out of the results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub resource_type: String,
    pub listed_type: String,
    pub access_denied: bool,
    pub message: String,
}

impl Alert {
    pub fn from_listing_error(err: &ListingError) -> Self {
        let access_denied = err.is_access_denied();
        let message = if access_denied {
            format!(
                "Ignoring {} from drift calculation: Listing {} is forbidden: {}",
                err.resource_type, err.listed_type, err.source
            )
        } else {
            format!("Ignoring {} from drift calculation: {}", err.resource_type, err.source)
        };

        Self {
            resource_type: err.resource_type.clone(),
            listed_type: err.listed_type.clone(),
            access_denied,
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Details(#[from] DetailsError),
}

/// Outcome of one scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub scan_id: Uuid,
    /// Sorted by type, then id
    pub resources: Vec<AbstractResource>,
    pub alerts: Vec<Alert>,
}

pub struct Scanner {
    library: RemoteLibrary,
    schemas: Arc<SchemaRepository>,
    options: ScannerOptions,
}

impl Scanner {
    pub fn new(
        library: RemoteLibrary,
        schemas: Arc<SchemaRepository>,
        options: ScannerOptions,
    ) -> Self {
        Self {
            library,
            schemas,
            options,
        }
    }

    /// Enumerate everything and collect resources and alerts
    pub async fn resources(&self) -> Result<ScanResult, ScanError> {
        let scan_id = Uuid::new_v4();
        let span = tracing::info_span!("scan", %scan_id);

        async {
            let (mut resources, alerts) = self.enumerate().await;

            if self.options.deep {
                resources = self.fetch_details(resources).await?;
            }
            resource::sort(&mut resources);

            tracing::info!(
                resources = resources.len(),
                alerts = alerts.len(),
                "Scan finished"
            );
            Ok::<_, ScanError>(ScanResult {
                scan_id,
                resources,
                alerts,
            })
        }
        .instrument(span)
        .await
    }

    async fn enumerate(&self) -> (Vec<AbstractResource>, Vec<Alert>) {
        let enumerators: Vec<_> = self
            .library
            .enumerators()
            .iter()
            .filter(|e| {
                let ignored = self.options.ignored_types.contains(e.supported_type());
                if ignored {
                    tracing::debug!(
                        resource_type = e.supported_type(),
                        "Ignored enumeration of resources since it is ignored in filter"
                    );
                }
                !ignored
            })
            .cloned()
            .collect();

        let outcomes: Vec<_> = stream::iter(enumerators)
            .map(|enumerator| async move {
                let ty = enumerator.supported_type();
                tracing::debug!(resource_type = ty, "Enumerating");
                (ty, enumerator.enumerate().await)
            })
            .buffer_unordered(self.options.max_concurrency.max(1))
            .collect()
            .await;

        let mut resources = Vec::new();
        let mut alerts = Vec::new();
        for (ty, outcome) in outcomes {
            match outcome {
                Ok(found) => {
                    for res in &found {
                        tracing::debug!(
                            id = res.id(),
                            resource_type = res.resource_type(),
                            "Found cloud resource"
                        );
                    }
                    resources.extend(found);
                }
                Err(err) => {
                    tracing::warn!(resource_type = ty, listed_type = %err.listed_type, "{}", err);
                    alerts.push(Alert::from_listing_error(&err));
                }
            }
        }
        alerts.sort_by(|a, b| a.resource_type.cmp(&b.resource_type));

        (resources, alerts)
    }

    /// Replace deep-mode resources with a full read
    ///
    /// Resources that vanished since listing are dropped; any other failure
    /// aborts the scan.
    async fn fetch_details(
        &self,
        resources: Vec<AbstractResource>,
    ) -> Result<Vec<AbstractResource>, ScanError> {
        let fetched: Vec<Option<AbstractResource>> = stream::iter(resources)
            .map(|res| async move {
                let fetcher = if self.schemas.is_deep_mode(res.resource_type()) {
                    self.library.details_fetcher(res.resource_type())
                } else {
                    None
                };
                let Some(fetcher) = fetcher else {
                    return Ok(Some(res));
                };

                match fetcher.read_details(&res).await {
                    Ok(detailed) => Ok(Some(detailed)),
                    Err(DetailsError::NotFound { resource_type, id }) => {
                        tracing::debug!(
                            %resource_type,
                            %id,
                            "Resource disappeared before details fetch"
                        );
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            })
            .buffered(self.options.max_concurrency.max(1))
            .try_collect()
            .await?;

        Ok(fetched.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::http::ApiError;
    use crate::remote::{DetailsFetcher, Enumerator};
    use crate::resource::{Attributes, ResourceFactory, TerraformResourceFactory};
    use crate::schema::Flags;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    struct Fixed {
        ty: &'static str,
        ids: Vec<&'static str>,
    }

    #[async_trait]
    impl Enumerator for Fixed {
        fn supported_type(&self) -> &'static str {
            self.ty
        }

        async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
            let factory = TerraformResourceFactory;
            Ok(self
                .ids
                .iter()
                .map(|id| factory.create_abstract_resource(self.ty, id, Attributes::new()))
                .collect())
        }
    }

    struct Failing {
        ty: &'static str,
        status: StatusCode,
    }

    #[async_trait]
    impl Enumerator for Failing {
        fn supported_type(&self) -> &'static str {
            self.ty
        }

        async fn enumerate(&self) -> Result<Vec<AbstractResource>, ListingError> {
            Err(ListingError::new(
                self.ty,
                ApiError::Status {
                    status: self.status,
                    message: "nope".into(),
                },
            ))
        }
    }

    struct Detailer;

    #[async_trait]
    impl DetailsFetcher for Detailer {
        async fn read_details(
            &self,
            res: &AbstractResource,
        ) -> Result<AbstractResource, DetailsError> {
            if res.id() == "gone" {
                return Err(DetailsError::NotFound {
                    resource_type: res.resource_type().to_string(),
                    id: res.id().to_string(),
                });
            }
            let mut detailed = res.clone();
            detailed.attributes_mut().insert("detailed", true);
            Ok(detailed)
        }
    }

    fn schemas() -> Arc<SchemaRepository> {
        let mut repo = SchemaRepository::new();
        repo.register("google_a");
        repo.register("google_b");
        repo.set_flags("google_a", Flags::DEEP_MODE);
        Arc::new(repo)
    }

    #[tokio::test]
    async fn test_listing_errors_become_alerts() {
        let mut library = RemoteLibrary::new();
        library.add_enumerator(Arc::new(Fixed {
            ty: "google_b",
            ids: vec!["2", "1"],
        }));
        library.add_enumerator(Arc::new(Failing {
            ty: "google_denied",
            status: StatusCode::FORBIDDEN,
        }));
        library.add_enumerator(Arc::new(Failing {
            ty: "google_broken",
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }));

        let result = Scanner::new(library, schemas(), ScannerOptions::default())
            .resources()
            .await
            .unwrap();

        let ids: Vec<_> = result.resources.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert_eq!(result.alerts.len(), 2);
        assert_eq!(result.alerts[0].resource_type, "google_broken");
        assert!(!result.alerts[0].access_denied);
        assert_eq!(result.alerts[1].resource_type, "google_denied");
        assert!(result.alerts[1].access_denied);
        assert!(result.alerts[1].message.starts_with(
            "Ignoring google_denied from drift calculation: Listing google_denied is forbidden"
        ));
    }

    #[tokio::test]
    async fn test_ignored_types_are_not_enumerated() {
        let mut library = RemoteLibrary::new();
        library.add_enumerator(Arc::new(Failing {
            ty: "google_denied",
            status: StatusCode::FORBIDDEN,
        }));

        let options = ScannerOptions {
            ignored_types: HashSet::from(["google_denied".to_string()]),
            ..Default::default()
        };
        let result = Scanner::new(library, schemas(), options).resources().await.unwrap();
        assert!(result.alerts.is_empty());
        assert!(result.resources.is_empty());
    }

    #[tokio::test]
    async fn test_deep_mode_fetches_flagged_types_only() {
        let mut library = RemoteLibrary::new();
        library.add_enumerator(Arc::new(Fixed {
            ty: "google_a",
            ids: vec!["x", "gone"],
        }));
        library.add_enumerator(Arc::new(Fixed {
            ty: "google_b",
            ids: vec!["y"],
        }));
        library.add_details_fetcher("google_a", Arc::new(Detailer));
        library.add_details_fetcher("google_b", Arc::new(Detailer));

        let options = ScannerOptions {
            deep: true,
            ..Default::default()
        };
        let result = Scanner::new(library, schemas(), options).resources().await.unwrap();

        assert_eq!(result.resources.len(), 2);
        assert_eq!(result.resources[0].id(), "x");
        assert!(result.resources[0].attributes().contains("detailed"));
        assert_eq!(result.resources[1].id(), "y");
        assert!(!result.resources[1].attributes().contains("detailed"));
    }
}
