//! Integration tests for the GCP REST client using wiremock
//!
//! These tests drive `GcpClient` and the cached repositories against mocked
//! endpoints: pagination, query parameters, IAM policy reads and error
//! classification.

use gcp_inventory::cache::Cache;
use gcp_inventory::gcp::auth::StaticToken;
use gcp_inventory::gcp::client::{
    AssetClient, Endpoints, GcpClient, ResourceManagerClient, StorageClient,
};
use gcp_inventory::remote::google::compute::FirewallEnumerator;
use gcp_inventory::remote::repository::{
    AssetRepository, CloudResourceManagerRepository, GcpAssetRepository,
    GcpCloudResourceManagerRepository, GcpStorageRepository, StorageRepository,
};
use gcp_inventory::remote::Enumerator;
use gcp_inventory::resource::TerraformResourceFactory;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Arc<GcpClient> {
    let client = GcpClient::with_token_source(
        Arc::new(StaticToken("test-token".into())),
        Endpoints::with_base(&server.uri()),
    )
    .expect("client should build")
    .with_page_size(2);
    Arc::new(client)
}

fn search_result(asset_type: &str, name: &str, display_name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "assetType": asset_type,
        "displayName": display_name,
        "project": "projects/123456",
        "location": "global"
    })
}

mod asset_tests {
    use super::*;

    async fn mount_two_pages(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/projects/test-project:searchAllResources"))
            .and(query_param("pageToken", "page-2"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    search_result(
                        "compute.googleapis.com/Network",
                        "//compute.googleapis.com/projects/test-project/global/networks/1",
                        "default"
                    )
                ]
            })))
            .with_priority(1)
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/test-project:searchAllResources"))
            .and(query_param("pageSize", "2"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    search_result(
                        "compute.googleapis.com/Firewall",
                        "//compute.googleapis.com/projects/test-project/global/firewalls/10",
                        "allow-ssh"
                    ),
                    search_result(
                        "compute.googleapis.com/Firewall",
                        "//compute.googleapis.com/projects/test-project/global/firewalls/11",
                        "allow-http"
                    )
                ],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    /// Both pages are drained once and shared by every kind
    #[tokio::test]
    async fn test_search_drains_pages_once_per_scan() {
        let server = MockServer::start().await;
        mount_two_pages(&server).await;

        let repository = GcpAssetRepository::new(
            client(&server),
            vec!["projects/test-project".into()],
            Arc::new(Cache::new(100)),
        );

        let firewalls = repository.search_all_firewalls().await.unwrap();
        let networks = repository.search_all_networks().await.unwrap();
        let routers = repository.search_all_routers().await.unwrap();

        assert_eq!(firewalls.len(), 2);
        assert_eq!(firewalls[0].display_name, "allow-ssh");
        assert_eq!(networks.len(), 1);
        assert!(routers.is_empty());
        // Mock expectations are verified when the server drops
    }

    /// Search requests list every asset type the repository serves
    #[tokio::test]
    async fn test_search_requests_asset_types() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/test-project:searchAllResources"))
            .and(query_param("assetTypes", "storage.googleapis.com/Bucket"))
            .and(query_param("assetTypes", "run.googleapis.com/Service"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .search_all_resources(
                "projects/test-project",
                &["storage.googleapis.com/Bucket", "run.googleapis.com/Service"],
                None,
            )
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    /// `assets.list` asks for the RESOURCE content type and exposes the payload
    #[tokio::test]
    async fn test_list_assets_reads_resource_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/test-project/assets"))
            .and(query_param("contentType", "RESOURCE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assets": [{
                    "name": "//sqladmin.googleapis.com/projects/test-project/instances/db-1",
                    "assetType": "sqladmin.googleapis.com/Instance",
                    "resource": {
                        "data": {"name": "db-1", "databaseVersion": "POSTGRES_14"},
                        "location": "europe-west1"
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let repository = GcpAssetRepository::new(
            client(&server),
            vec!["projects/test-project".into()],
            Arc::new(Cache::new(100)),
        );

        let instances = repository.search_all_sql_database_instances().await.unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].data_str("name"), Some("db-1"));
        assert!(repository.search_all_functions().await.unwrap().is_empty());
    }

    /// A 403 surfaces as an access-denied listing error for the kind
    #[tokio::test]
    async fn test_403_is_access_denied() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/test-project:searchAllResources"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "The caller does not have permission",
                    "status": "PERMISSION_DENIED"
                }
            })))
            .mount(&server)
            .await;

        let repository: Arc<dyn AssetRepository> = Arc::new(GcpAssetRepository::new(
            client(&server),
            vec!["projects/test-project".into()],
            Arc::new(Cache::new(100)),
        ));
        let enumerator = FirewallEnumerator::new(repository, Arc::new(TerraformResourceFactory));

        let err = enumerator.enumerate().await.unwrap_err();
        assert!(err.is_access_denied());
        assert_eq!(err.resource_type, "google_compute_firewall");
        assert_eq!(err.listed_type, "google_compute_firewall");
        assert!(err.to_string().contains("The caller does not have permission"));
    }

    /// A failed drain caches nothing, so the next call retries
    #[tokio::test]
    async fn test_failed_drain_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/test-project:searchAllResources"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let cache = Arc::new(Cache::new(100));
        let repository = GcpAssetRepository::new(
            client(&server),
            vec!["projects/test-project".into()],
            cache.clone(),
        );

        assert!(repository.search_all_buckets().await.is_err());
        assert!(repository.search_all_buckets().await.is_err());
        assert!(cache.is_empty());
    }
}

mod policy_tests {
    use super::*;

    #[tokio::test]
    async fn test_project_policy_post() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/test-project:getIamPolicy"))
            .and(bearer_token("test-token"))
            .and(body_json(json!({"options": {"requestedPolicyVersion": 3}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": 3,
                "etag": "BwXyz=",
                "bindings": [
                    {"role": "roles/owner", "members": ["user:a@example.com", "user:b@example.com"]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let policy = client(&server).get_project_iam_policy("test-project").await.unwrap();
        assert_eq!(policy.etag.as_deref(), Some("BwXyz="));
        assert_eq!(policy.bindings[0].members.len(), 2);
    }

    /// Project bindings are read once per project per scan
    #[tokio::test]
    async fn test_project_bindings_cached_per_project() {
        let server = MockServer::start().await;

        let grants = [
            ("project-a", "user:a@example.com"),
            ("project-b", "user:b@example.com"),
        ];
        for (project, member) in grants {
            Mock::given(method("POST"))
                .and(path(format!("/v1/projects/{}:getIamPolicy", project)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "bindings": [{"role": "roles/viewer", "members": [member]}]
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let repository = GcpCloudResourceManagerRepository::new(
            client(&server),
            vec!["project-a".into(), "project-b".into()],
            Arc::new(Cache::new(100)),
        );

        let first = repository.list_projects_bindings().await.unwrap();
        let second = repository.list_projects_bindings().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first["project-a"]["roles/viewer"], vec!["user:a@example.com"]);
        assert_eq!(first["project-b"]["roles/viewer"], vec!["user:b@example.com"]);
    }

    /// Buckets get their own bindings
    #[tokio::test]
    async fn test_bucket_bindings_keyed_per_bucket() {
        let server = MockServer::start().await;

        let grants = [
            ("bucket-1", "roles/storage.admin"),
            ("bucket-2", "roles/storage.objectViewer"),
        ];
        for (bucket, role) in grants {
            Mock::given(method("GET"))
                .and(path(format!("/storage/v1/b/{}/iam", bucket)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "kind": "storage#policy",
                    "bindings": [{"role": role, "members": ["user:a@example.com"]}]
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let repository = GcpStorageRepository::new(client(&server), Arc::new(Cache::new(100)));

        let first = repository.list_all_bindings("bucket-1").await.unwrap();
        let second = repository.list_all_bindings("bucket-2").await.unwrap();
        let again = repository.list_all_bindings("bucket-1").await.unwrap();

        assert!(first.contains_key("roles/storage.admin"));
        assert!(second.contains_key("roles/storage.objectViewer"));
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn test_bucket_policy_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b/missing/iam"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "The specified bucket does not exist."}
            })))
            .mount(&server)
            .await;

        let err = client(&server).get_bucket_iam_policy("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
        assert!(!err.is_access_denied());
    }
}
