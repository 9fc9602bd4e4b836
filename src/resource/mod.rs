//! Resource model
//!
//! Every enumerator emits [`AbstractResource`] values: a Terraform type tag,
//! a Terraform-compatible id and an ordered attribute bag. The comparison
//! engine joins cloud and state records on `(type, id)`, so ids must be
//! derived deterministically from provider-supplied fields.

pub mod types;

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered attribute bag
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Delete a dotted path such as `["encryption", "kms_key"]`.
    ///
    /// Missing intermediate keys and non-object intermediates are ignored.
    pub fn safe_delete(&mut self, path: &[&str]) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let Some((first, rest)) = parents.split_first() else {
            self.0.remove(*last);
            return;
        };

        let mut current = match self.0.get_mut(*first) {
            Some(v) => v,
            None => return,
        };
        for key in rest {
            current = match current.get_mut(*key) {
                Some(v) => v,
                None => return,
            };
        }
        if let Value::Object(map) = current {
            map.remove(*last);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Canonical output record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbstractResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: Attributes,
}

impl AbstractResource {
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// Shared construction point for enumerators
pub trait ResourceFactory: Send + Sync {
    fn create_abstract_resource(
        &self,
        ty: &str,
        id: &str,
        attributes: Attributes,
    ) -> AbstractResource;
}

/// Factory that stamps type, id and attributes as given
#[derive(Debug, Default, Clone, Copy)]
pub struct TerraformResourceFactory;

impl ResourceFactory for TerraformResourceFactory {
    fn create_abstract_resource(
        &self,
        ty: &str,
        id: &str,
        attributes: Attributes,
    ) -> AbstractResource {
        AbstractResource {
            resource_type: ty.to_string(),
            id: id.to_string(),
            attributes,
        }
    }
}

/// Order by type, then id
pub fn sort(resources: &mut [AbstractResource]) {
    resources.sort_by(|a, b| {
        a.resource_type
            .cmp(&b.resource_type)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Output projection of a resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializableResource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub human_readable_attributes: BTreeMap<String, String>,
}

impl SerializableResource {
    pub fn new(
        res: &AbstractResource,
        human_readable_attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: res.id.clone(),
            resource_type: res.resource_type.clone(),
            human_readable_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_delete_nested() {
        let mut attrs: Attributes = [
            ("name", json!("bucket")),
            ("encryption", json!({"kms_key": "k", "mode": "auto"})),
        ]
        .into_iter()
        .collect();

        attrs.safe_delete(&["encryption", "kms_key"]);
        attrs.safe_delete(&["missing", "child"]);
        attrs.safe_delete(&["name", "child"]);

        assert_eq!(attrs.get("encryption"), Some(&json!({"mode": "auto"})));
        assert_eq!(attrs.get_str("name"), Some("bucket"));

        attrs.safe_delete(&["name"]);
        assert!(!attrs.contains("name"));
    }

    #[test]
    fn test_sort_orders_by_type_then_id() {
        let factory = TerraformResourceFactory;
        let mut resources = vec![
            factory.create_abstract_resource("google_storage_bucket", "b", Attributes::new()),
            factory.create_abstract_resource("google_compute_network", "z", Attributes::new()),
            factory.create_abstract_resource("google_storage_bucket", "a", Attributes::new()),
        ];
        sort(&mut resources);

        let keys: Vec<_> = resources.iter().map(|r| (r.resource_type(), r.id())).collect();
        assert_eq!(
            keys,
            vec![
                ("google_compute_network", "z"),
                ("google_storage_bucket", "a"),
                ("google_storage_bucket", "b"),
            ]
        );
    }

    #[test]
    fn test_serializable_resource_skips_empty_attributes() {
        let res = TerraformResourceFactory.create_abstract_resource(
            "google_storage_bucket",
            "b",
            Attributes::new(),
        );
        let out = serde_json::to_value(SerializableResource::new(&res, BTreeMap::new())).unwrap();
        assert_eq!(out, json!({"id": "b", "type": "google_storage_bucket"}));
    }
}
