//! Terraform type tags of the Google resources this crate enumerates

pub const GOOGLE_STORAGE_BUCKET: &str = "google_storage_bucket";
pub const GOOGLE_STORAGE_BUCKET_IAM_MEMBER: &str = "google_storage_bucket_iam_member";
pub const GOOGLE_STORAGE_BUCKET_IAM_BINDING: &str = "google_storage_bucket_iam_binding";

pub const GOOGLE_COMPUTE_FIREWALL: &str = "google_compute_firewall";
pub const GOOGLE_COMPUTE_ROUTER: &str = "google_compute_router";
pub const GOOGLE_COMPUTE_INSTANCE: &str = "google_compute_instance";
pub const GOOGLE_COMPUTE_NETWORK: &str = "google_compute_network";
pub const GOOGLE_COMPUTE_SUBNETWORK: &str = "google_compute_subnetwork";
pub const GOOGLE_COMPUTE_DISK: &str = "google_compute_disk";
pub const GOOGLE_COMPUTE_IMAGE: &str = "google_compute_image";
pub const GOOGLE_COMPUTE_INSTANCE_GROUP: &str = "google_compute_instance_group";
pub const GOOGLE_COMPUTE_ADDRESS: &str = "google_compute_address";
pub const GOOGLE_COMPUTE_GLOBAL_ADDRESS: &str = "google_compute_global_address";
pub const GOOGLE_COMPUTE_HEALTH_CHECK: &str = "google_compute_health_check";
pub const GOOGLE_COMPUTE_NODE_GROUP: &str = "google_compute_node_group";
pub const GOOGLE_COMPUTE_FORWARDING_RULE: &str = "google_compute_forwarding_rule";
pub const GOOGLE_COMPUTE_GLOBAL_FORWARDING_RULE: &str = "google_compute_global_forwarding_rule";
pub const GOOGLE_COMPUTE_INSTANCE_GROUP_MANAGER: &str = "google_compute_instance_group_manager";
pub const GOOGLE_COMPUTE_SSL_CERTIFICATE: &str = "google_compute_ssl_certificate";

pub const GOOGLE_DNS_MANAGED_ZONE: &str = "google_dns_managed_zone";

pub const GOOGLE_BIGQUERY_DATASET: &str = "google_bigquery_dataset";
pub const GOOGLE_BIGQUERY_TABLE: &str = "google_bigquery_table";

pub const GOOGLE_BIGTABLE_INSTANCE: &str = "google_bigtable_instance";
pub const GOOGLE_BIGTABLE_TABLE: &str = "google_bigtable_table";

pub const GOOGLE_SQL_DATABASE_INSTANCE: &str = "google_sql_database_instance";

pub const GOOGLE_CLOUDFUNCTIONS_FUNCTION: &str = "google_cloudfunctions_function";

pub const GOOGLE_CLOUD_RUN_SERVICE: &str = "google_cloud_run_service";

pub const GOOGLE_KMS_CRYPTO_KEY: &str = "google_kms_crypto_key";

pub const GOOGLE_PROJECT_IAM_MEMBER: &str = "google_project_iam_member";
pub const GOOGLE_PROJECT_IAM_BINDING: &str = "google_project_iam_binding";

/// Every supported type, sorted
pub const ALL: &[&str] = &[
    GOOGLE_BIGQUERY_DATASET,
    GOOGLE_BIGQUERY_TABLE,
    GOOGLE_BIGTABLE_INSTANCE,
    GOOGLE_BIGTABLE_TABLE,
    GOOGLE_CLOUD_RUN_SERVICE,
    GOOGLE_CLOUDFUNCTIONS_FUNCTION,
    GOOGLE_COMPUTE_ADDRESS,
    GOOGLE_COMPUTE_DISK,
    GOOGLE_COMPUTE_FIREWALL,
    GOOGLE_COMPUTE_FORWARDING_RULE,
    GOOGLE_COMPUTE_GLOBAL_ADDRESS,
    GOOGLE_COMPUTE_GLOBAL_FORWARDING_RULE,
    GOOGLE_COMPUTE_HEALTH_CHECK,
    GOOGLE_COMPUTE_IMAGE,
    GOOGLE_COMPUTE_INSTANCE,
    GOOGLE_COMPUTE_INSTANCE_GROUP,
    GOOGLE_COMPUTE_INSTANCE_GROUP_MANAGER,
    GOOGLE_COMPUTE_NETWORK,
    GOOGLE_COMPUTE_NODE_GROUP,
    GOOGLE_COMPUTE_ROUTER,
    GOOGLE_COMPUTE_SSL_CERTIFICATE,
    GOOGLE_COMPUTE_SUBNETWORK,
    GOOGLE_DNS_MANAGED_ZONE,
    GOOGLE_KMS_CRYPTO_KEY,
    GOOGLE_PROJECT_IAM_BINDING,
    GOOGLE_PROJECT_IAM_MEMBER,
    GOOGLE_SQL_DATABASE_INSTANCE,
    GOOGLE_STORAGE_BUCKET,
    GOOGLE_STORAGE_BUCKET_IAM_BINDING,
    GOOGLE_STORAGE_BUCKET_IAM_MEMBER,
];
