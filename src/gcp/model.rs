//! Upstream API payloads
//!
//! Response shapes of the Cloud Asset, Cloud Resource Manager and Cloud
//! Storage JSON APIs, reduced to the fields enumeration needs.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One result of `searchAllResources`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSearchResult {
    /// Full resource name, e.g. `//compute.googleapis.com/projects/p/global/networks/n`
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub additional_attributes: Option<Map<String, Value>>,
}

impl ResourceSearchResult {
    /// String field from `additionalAttributes`
    pub fn additional_attribute(&self, field: &str) -> Option<&str> {
        self.additional_attributes
            .as_ref()
            .and_then(|attrs| attrs.get(field))
            .and_then(|v| v.as_str())
    }
}

/// One result of `assets.list` with content type `RESOURCE`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub resource: Option<AssetResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResource {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub location: String,
}

impl Asset {
    /// Field of the provider payload (`resource.data`), if present
    pub fn data_field(&self, field: &str) -> Option<&Value> {
        self.resource
            .as_ref()
            .and_then(|r| r.data.as_ref())
            .and_then(|data| data.get(field))
    }

    /// String field of the provider payload; absent, non-string and empty
    /// values all read as `None`
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data_field(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchAllResourcesResponse {
    #[serde(default)]
    pub results: Vec<ResourceSearchResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListAssetsResponse {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// IAM policy document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub bindings: Vec<PolicyBinding>,
    #[serde(default)]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PolicyBinding {
    pub role: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_result_deserializes_camel_case() {
        let result: ResourceSearchResult = serde_json::from_value(json!({
            "name": "//compute.googleapis.com/projects/p/regions/us-central1/addresses/a",
            "assetType": "compute.googleapis.com/Address",
            "displayName": "a",
            "location": "us-central1",
            "additionalAttributes": {"address": "1.2.3.4"}
        }))
        .unwrap();

        assert_eq!(result.display_name, "a");
        assert_eq!(result.additional_attribute("address"), Some("1.2.3.4"));
        assert_eq!(result.additional_attribute("missing"), None);
    }

    #[test]
    fn test_asset_data_str_treats_empty_as_missing() {
        let asset: Asset = serde_json::from_value(json!({
            "name": "//bigtable.googleapis.com/projects/p/instances/i",
            "assetType": "bigtableadmin.googleapis.com/Instance",
            "resource": {"data": {"name": "", "state": "READY"}}
        }))
        .unwrap();

        assert_eq!(asset.data_str("name"), None);
        assert_eq!(asset.data_str("state"), Some("READY"));

        let bare = Asset::default();
        assert_eq!(bare.data_str("name"), None);
    }
}
