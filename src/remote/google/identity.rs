//! Identity reconstruction
//!
//! Pure functions turning Cloud Asset resource names into the ids Terraform
//! assigns to the same objects. Full resource names look like
//! `//compute.googleapis.com/projects/<p>/global/firewalls/<f>`; splitting on
//! `/` yields two leading empty segments and the service host, so the project
//! id always sits at index 4.
//!
//! Parsers return `None` when the name has an unexpected shape; callers log
//! and skip the record.

const SERVICE_HOST_SUFFIX: &str = ".googleapis.com";

/// Strip the leading `//<service>.googleapis.com/` from a full resource name.
///
/// Names without that prefix are returned unchanged, so trimming twice is
/// the same as trimming once.
pub fn trim_resource_name(name: &str) -> &str {
    let mut rest = name;
    while let Some(stripped) = strip_service_prefix(rest) {
        rest = stripped;
    }
    rest
}

fn strip_service_prefix(name: &str) -> Option<&str> {
    let after_slashes = name.strip_prefix("//")?;
    let (host, rest) = after_slashes.split_once('/')?;
    host.ends_with(SERVICE_HOST_SUFFIX).then_some(rest)
}

/// Split a name into exactly `expected` `/`-separated segments
fn segments(name: &str, expected: usize) -> Option<Vec<&str>> {
    let parts: Vec<&str> = name.split('/').collect();
    (parts.len() == expected).then_some(parts)
}

/// Firewall id and its project
///
/// `//compute.googleapis.com/projects/<p>/global/firewalls/<f>` becomes
/// `projects/<p>/global/firewalls/<display_name>`.
pub fn firewall_id<'a>(name: &'a str, display_name: &str) -> Option<(String, &'a str)> {
    let parts = segments(name, 8)?;
    let project = parts[4];
    Some((format!("projects/{}/global/firewalls/{}", project, display_name), project))
}

/// `projects/<p>/global/networks/<display_name>`
pub fn network_id(name: &str, display_name: &str) -> Option<String> {
    let parts = segments(name, 8)?;
    Some(format!("projects/{}/global/networks/{}", parts[4], display_name))
}

/// `projects/<p>/zones/<z>/instanceGroups/<display_name>`
pub fn instance_group_id(name: &str, display_name: &str) -> Option<String> {
    let parts = segments(name, 9)?;
    Some(format!(
        "projects/{}/zones/{}/instanceGroups/{}",
        parts[4], parts[6], display_name
    ))
}

/// `projects/<p>/managedZones/<display_name>`
///
/// The last segment of the asset name is the numeric zone id, which
/// Terraform does not use.
pub fn dns_managed_zone_id(name: &str, display_name: &str) -> Option<String> {
    let parts = segments(name, 7)?;
    Some(format!("projects/{}/managedZones/{}", parts[4], display_name))
}

/// `locations/<l>/namespaces/<p>/services/<s>`
pub fn cloud_run_service_id(name: &str) -> Option<String> {
    let parts = segments(name, 9)?;
    Some(format!(
        "locations/{}/namespaces/{}/services/{}",
        parts[6], parts[4], parts[8]
    ))
}

pub fn project_iam_member_id(project: &str, role: &str, member: &str) -> String {
    format!("{}/{}/{}", project, role, member)
}

pub fn project_iam_binding_id(project: &str, role: &str) -> String {
    format!("{}/{}", project, role)
}

pub fn bucket_iam_member_id(bucket: &str, role: &str, member: &str) -> String {
    format!("b/{}/{}/{}", bucket, role, member)
}

pub fn bucket_iam_binding_id(bucket: &str, role: &str) -> String {
    format!("b/{}/{}", bucket, role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_resource_name() {
        assert_eq!(
            trim_resource_name("//compute.googleapis.com/projects/p/zones/z/instances/i"),
            "projects/p/zones/z/instances/i"
        );
        assert_eq!(
            trim_resource_name("//bigquery.googleapis.com/projects/p/datasets/d"),
            "projects/p/datasets/d"
        );
        assert_eq!(
            trim_resource_name("projects/p/global/networks/n"),
            "projects/p/global/networks/n"
        );
    }

    #[test]
    fn test_trim_keeps_non_service_double_slash() {
        assert_eq!(
            trim_resource_name("//projects/p/regions/r/nodeGroups/g"),
            "//projects/p/regions/r/nodeGroups/g"
        );
        assert_eq!(trim_resource_name("//example.com/x"), "//example.com/x");
        assert_eq!(trim_resource_name("//compute.googleapis.com"), "//compute.googleapis.com");
    }

    #[test]
    fn test_trim_is_idempotent_on_nested_prefixes() {
        let name = "//a.googleapis.com///b.googleapis.com/projects/p";
        let once = trim_resource_name(name);
        assert_eq!(once, "projects/p");
        assert_eq!(trim_resource_name(once), once);
    }

    #[test]
    fn test_firewall_id() {
        let (id, project) = firewall_id(
            "//compute.googleapis.com/projects/cloudskiff-dev/global/firewalls/123",
            "test-firewall-0",
        )
        .unwrap();
        assert_eq!(id, "projects/cloudskiff-dev/global/firewalls/test-firewall-0");
        assert_eq!(project, "cloudskiff-dev");
    }

    #[test]
    fn test_firewall_id_rejects_wrong_segment_count() {
        assert!(firewall_id("//compute.googleapis.com/projects/p", "fw").is_none());
        assert!(firewall_id("invalid ID", "fw").is_none());
        let too_long = "//compute.googleapis.com/projects/p/global/firewalls/f/extra";
        assert!(firewall_id(too_long, "fw").is_none());
    }

    #[test]
    fn test_network_id() {
        let name = "//compute.googleapis.com/projects/p/global/networks/42";
        assert_eq!(
            network_id(name, "default").as_deref(),
            Some("projects/p/global/networks/default")
        );
        assert!(network_id("//compute.googleapis.com/projects/p/networks/42", "default").is_none());
    }

    #[test]
    fn test_instance_group_id() {
        assert_eq!(
            instance_group_id(
                "//compute.googleapis.com/projects/p/zones/us-central1-a/instanceGroups/1",
                "group-1"
            )
            .as_deref(),
            Some("projects/p/zones/us-central1-a/instanceGroups/group-1")
        );
    }

    #[test]
    fn test_dns_managed_zone_id() {
        assert_eq!(
            dns_managed_zone_id(
                "//dns.googleapis.com/projects/cloudskiff-dev-raphael/managedZones/123456789",
                "test-zone-0"
            )
            .as_deref(),
            Some("projects/cloudskiff-dev-raphael/managedZones/test-zone-0")
        );
        assert!(dns_managed_zone_id("invalid ID", "test-zone-0").is_none());
    }

    #[test]
    fn test_cloud_run_service_id() {
        let name = concat!(
            "//run.googleapis.com/projects/cloudskiff-dev-elie",
            "/locations/us-central1/services/cloudrun-srv-1"
        );
        assert_eq!(
            cloud_run_service_id(name).as_deref(),
            Some("locations/us-central1/namespaces/cloudskiff-dev-elie/services/cloudrun-srv-1")
        );
        assert!(cloud_run_service_id("invalid ID").is_none());
    }

    #[test]
    fn test_iam_ids() {
        assert_eq!(
            project_iam_member_id("p", "roles/viewer", "user:a@example.com"),
            "p/roles/viewer/user:a@example.com"
        );
        assert_eq!(project_iam_binding_id("p", "roles/viewer"), "p/roles/viewer");
        assert_eq!(
            bucket_iam_member_id("bkt", "roles/storage.admin", "user:a@example.com"),
            "b/bkt/roles/storage.admin/user:a@example.com"
        );
        assert_eq!(
            bucket_iam_binding_id("bkt", "roles/storage.admin"),
            "b/bkt/roles/storage.admin"
        );
    }
}
