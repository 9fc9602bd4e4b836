//! Google type registrations

use super::{Flags, HumanReadableAttributesFn, SchemaRepository};
use crate::resource::types::*;
use crate::resource::AbstractResource;
use std::collections::BTreeMap;

/// Attributes Terraform fills in on apply for every Google type
const GENERATED: &[&[&str]] = &[&["timeouts"], &["self_link"], &["creation_timestamp"], &["id"]];

fn strip(res: &mut AbstractResource, paths: &[&[&str]]) {
    let attrs = res.attributes_mut();
    for path in GENERATED.iter().chain(paths) {
        attrs.safe_delete(path);
    }
}

fn normalize_generated(res: &mut AbstractResource) {
    strip(res, &[]);
}

fn normalize_storage_bucket(res: &mut AbstractResource) {
    strip(res, &[&["force_destroy"], &["url"], &["retention_policy", "is_locked"]]);
}

fn normalize_compute_firewall(res: &mut AbstractResource) {
    strip(res, &[&["enable_logging"]]);
}

fn normalize_compute_instance(res: &mut AbstractResource) {
    strip(
        res,
        &[
            &["allow_stopping_for_update"],
            &["cpu_platform"],
            &["current_status"],
            &["instance_id"],
            &["label_fingerprint"],
            &["metadata_fingerprint"],
            &["tags_fingerprint"],
            &["boot_disk", "disk_encryption_key_sha256"],
        ],
    );
}

fn normalize_compute_network(res: &mut AbstractResource) {
    strip(res, &[&["delete_default_routes_on_create"], &["gateway_ipv4"]]);
}

fn normalize_compute_disk(res: &mut AbstractResource) {
    strip(
        res,
        &[
            &["label_fingerprint"],
            &["last_attach_timestamp"],
            &["last_detach_timestamp"],
            &["users"],
        ],
    );
}

fn normalize_sql_database_instance(res: &mut AbstractResource) {
    strip(
        res,
        &[
            &["deletion_protection"],
            &["root_password"],
            &["server_ca_cert"],
            &["settings", "version"],
        ],
    );
}

fn normalize_dns_managed_zone(res: &mut AbstractResource) {
    strip(res, &[&["force_destroy"], &["name_servers"]]);
}

fn normalize_cloudfunctions_function(res: &mut AbstractResource) {
    strip(res, &[&["source_archive_object"], &["source_archive_bucket"]]);
}

fn normalize_iam(res: &mut AbstractResource) {
    strip(res, &[&["etag"]]);
}

fn pick(res: &AbstractResource, fields: &[(&str, &str)]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|(label, key)| {
            res.attributes()
                .get_str(key)
                .filter(|v| !v.is_empty())
                .map(|v| (label.to_string(), v.to_string()))
        })
        .collect()
}

fn name_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Name", "name")])
}

fn firewall_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Name", "name"), ("Project", "project")])
}

fn address_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Name", "name"), ("Address", "address")])
}

fn cloud_run_service_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Name", "name"), ("Location", "location")])
}

fn project_iam_member_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Project", "project"), ("Role", "role"), ("Member", "member")])
}

fn project_iam_binding_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Project", "project"), ("Role", "role")])
}

fn bucket_iam_member_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Bucket", "bucket"), ("Role", "role"), ("Member", "member")])
}

fn bucket_iam_binding_attributes(res: &AbstractResource) -> BTreeMap<String, String> {
    pick(res, &[("Bucket", "bucket"), ("Role", "role")])
}

/// Register every Google type with its hooks and flags
pub fn init_resources_metadata(repo: &mut SchemaRepository) {
    for ty in ALL {
        repo.register(ty);
        repo.set_normalize_func(ty, normalize_generated);
        repo.set_human_readable_attributes_func(ty, name_attributes);
    }

    repo.set_normalize_func(GOOGLE_STORAGE_BUCKET, normalize_storage_bucket);
    repo.set_normalize_func(GOOGLE_COMPUTE_FIREWALL, normalize_compute_firewall);
    repo.set_normalize_func(GOOGLE_COMPUTE_INSTANCE, normalize_compute_instance);
    repo.set_normalize_func(GOOGLE_COMPUTE_NETWORK, normalize_compute_network);
    repo.set_normalize_func(GOOGLE_COMPUTE_DISK, normalize_compute_disk);
    repo.set_normalize_func(GOOGLE_SQL_DATABASE_INSTANCE, normalize_sql_database_instance);
    repo.set_normalize_func(GOOGLE_DNS_MANAGED_ZONE, normalize_dns_managed_zone);
    repo.set_normalize_func(GOOGLE_CLOUDFUNCTIONS_FUNCTION, normalize_cloudfunctions_function);
    for ty in [
        GOOGLE_PROJECT_IAM_MEMBER,
        GOOGLE_PROJECT_IAM_BINDING,
        GOOGLE_STORAGE_BUCKET_IAM_MEMBER,
        GOOGLE_STORAGE_BUCKET_IAM_BINDING,
    ] {
        repo.set_normalize_func(ty, normalize_iam);
    }

    let readable: [(&str, HumanReadableAttributesFn); 8] = [
        (GOOGLE_COMPUTE_FIREWALL, firewall_attributes),
        (GOOGLE_COMPUTE_ADDRESS, address_attributes),
        (GOOGLE_COMPUTE_GLOBAL_ADDRESS, address_attributes),
        (GOOGLE_CLOUD_RUN_SERVICE, cloud_run_service_attributes),
        (GOOGLE_PROJECT_IAM_MEMBER, project_iam_member_attributes),
        (GOOGLE_PROJECT_IAM_BINDING, project_iam_binding_attributes),
        (GOOGLE_STORAGE_BUCKET_IAM_MEMBER, bucket_iam_member_attributes),
        (GOOGLE_STORAGE_BUCKET_IAM_BINDING, bucket_iam_binding_attributes),
    ];
    for (ty, func) in readable {
        repo.set_human_readable_attributes_func(ty, func);
    }

    // IAM records carry every comparable field already
    for ty in ALL.iter().filter(|ty| !ty.contains("_iam_")) {
        repo.set_flags(ty, Flags::DEEP_MODE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Attributes, ResourceFactory, TerraformResourceFactory};
    use serde_json::json;

    fn repository() -> SchemaRepository {
        let mut repo = SchemaRepository::new();
        init_resources_metadata(&mut repo);
        repo
    }

    fn noisy_attributes() -> Attributes {
        [
            ("name", json!("n")),
            ("project", json!("p")),
            ("role", json!("roles/viewer")),
            ("member", json!("user:a@example.com")),
            ("bucket", json!("b/bkt")),
            ("address", json!("10.0.0.1")),
            ("location", json!("us-central1")),
            ("self_link", json!("https://www.googleapis.com/x")),
            ("timeouts", json!({"create": "5m"})),
            ("etag", json!("BwX=")),
            ("force_destroy", json!(true)),
            ("label_fingerprint", json!("abc")),
            ("boot_disk", json!({"disk_encryption_key_sha256": "x", "auto_delete": true})),
            ("settings", json!({"version": 3, "tier": "db-f1-micro"})),
            ("retention_policy", json!({"is_locked": false, "retention_period": 10})),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_every_type_registered() {
        let repo = repository();
        for ty in ALL {
            assert!(repo.get_schema(ty).is_some(), "{} not registered", ty);
        }
    }

    #[test]
    fn test_normalize_is_idempotent_for_every_type() {
        let repo = repository();
        for ty in repo.types() {
            let mut once =
                TerraformResourceFactory.create_abstract_resource(ty, "id", noisy_attributes());
            repo.normalize(&mut once);
            let mut twice = once.clone();
            repo.normalize(&mut twice);
            assert_eq!(once, twice, "normalize of {} is not idempotent", ty);
            assert!(!once.attributes().contains("timeouts"));
        }
    }

    #[test]
    fn test_instance_normalize_strips_nested_field() {
        let repo = repository();
        let mut res = TerraformResourceFactory.create_abstract_resource(
            GOOGLE_COMPUTE_INSTANCE,
            "id",
            noisy_attributes(),
        );
        repo.normalize(&mut res);

        assert_eq!(res.attributes().get("boot_disk"), Some(&json!({"auto_delete": true})));
        assert!(!res.attributes().contains("label_fingerprint"));
        assert_eq!(res.attributes().get_str("name"), Some("n"));
    }

    #[test]
    fn test_deep_mode_excludes_iam_types() {
        let repo = repository();
        assert!(repo.is_deep_mode(GOOGLE_COMPUTE_FIREWALL));
        assert!(repo.is_deep_mode(GOOGLE_STORAGE_BUCKET));
        assert!(!repo.is_deep_mode(GOOGLE_PROJECT_IAM_MEMBER));
        assert!(!repo.is_deep_mode(GOOGLE_STORAGE_BUCKET_IAM_BINDING));
        assert_eq!(repo.deep_mode_types().len(), ALL.len() - 4);
    }

    #[test]
    fn test_human_readable_attributes() {
        let repo = repository();
        let res = TerraformResourceFactory.create_abstract_resource(
            GOOGLE_PROJECT_IAM_MEMBER,
            "p/roles/viewer/user:a@example.com",
            noisy_attributes(),
        );
        let attrs = repo.human_readable_attributes(&res);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs["Member"], "user:a@example.com");

        let fw = TerraformResourceFactory.create_abstract_resource(
            GOOGLE_COMPUTE_FIREWALL,
            "id",
            noisy_attributes(),
        );
        assert_eq!(
            repo.human_readable_attributes(&fw),
            BTreeMap::from([
                ("Name".to_string(), "n".to_string()),
                ("Project".to_string(), "p".to_string()),
            ])
        );
    }
}
