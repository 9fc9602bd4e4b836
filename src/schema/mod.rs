//! Schema Normalization Registry
//!
//! Per-type hooks consumed by the comparison engine:
//!
//! - a normalize hook deleting attributes that cannot be compared
//!   (write-only, generated on apply, local toggles);
//! - a human-readable-attributes hook projecting a resource down to what a
//!   report should show;
//! - flags, currently only [`Flags::DEEP_MODE`].
//!
//! Hooks are plain `fn` pointers, so they cannot capture state.

pub mod google;

use crate::resource::{AbstractResource, SerializableResource};
use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    /// Per-type classification bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// Enumerated attributes are identity-only; a full read through the
        /// provider is needed before comparing.
        const DEEP_MODE = 1;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

pub type NormalizeFn = fn(&mut AbstractResource);
pub type HumanReadableAttributesFn = fn(&AbstractResource) -> BTreeMap<String, String>;

/// Hooks registered for one type
#[derive(Debug, Clone, Copy, Default)]
pub struct Schema {
    pub flags: Flags,
    pub normalize: Option<NormalizeFn>,
    pub human_readable_attributes: Option<HumanReadableAttributesFn>,
}

/// Registry of [`Schema`]s keyed by Terraform type
#[derive(Debug, Default)]
pub struct SchemaRepository {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ty` known, keeping any hooks already set
    pub fn register(&mut self, ty: &str) {
        self.schemas.entry(ty.to_string()).or_default();
    }

    pub fn get_schema(&self, ty: &str) -> Option<&Schema> {
        self.schemas.get(ty)
    }

    fn schema_mut(&mut self, ty: &str, what: &str) -> Option<&mut Schema> {
        let schema = self.schemas.get_mut(ty);
        if schema.is_none() {
            tracing::warn!(resource_type = ty, "Unable to set {}, no schema found", what);
        }
        schema
    }

    /// Add flags to a registered type; unknown types are ignored
    pub fn set_flags(&mut self, ty: &str, flags: Flags) {
        if let Some(schema) = self.schema_mut(ty, "flags") {
            schema.flags.insert(flags);
        }
    }

    pub fn set_normalize_func(&mut self, ty: &str, normalize: NormalizeFn) {
        if let Some(schema) = self.schema_mut(ty, "normalize func") {
            schema.normalize = Some(normalize);
        }
    }

    pub fn set_human_readable_attributes_func(
        &mut self,
        ty: &str,
        func: HumanReadableAttributesFn,
    ) {
        if let Some(schema) = self.schema_mut(ty, "human readable attributes") {
            schema.human_readable_attributes = Some(func);
        }
    }

    /// Run the normalize hook of the resource's type, if any
    pub fn normalize(&self, res: &mut AbstractResource) {
        if let Some(normalize) = self.get_schema(&res.resource_type).and_then(|s| s.normalize) {
            normalize(res);
        }
    }

    /// Display subset of a resource; empty when no hook is registered
    pub fn human_readable_attributes(&self, res: &AbstractResource) -> BTreeMap<String, String> {
        self.get_schema(&res.resource_type)
            .and_then(|s| s.human_readable_attributes)
            .map(|f| f(res))
            .unwrap_or_default()
    }

    pub fn is_deep_mode(&self, ty: &str) -> bool {
        self.get_schema(ty)
            .map(|s| s.flags.contains(Flags::DEEP_MODE))
            .unwrap_or(false)
    }

    /// Types flagged [`Flags::DEEP_MODE`], sorted
    pub fn deep_mode_types(&self) -> Vec<&str> {
        self.schemas
            .iter()
            .filter(|(_, s)| s.flags.contains(Flags::DEEP_MODE))
            .map(|(ty, _)| ty.as_str())
            .collect()
    }

    /// Registered types, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn serializable(&self, res: &AbstractResource) -> SerializableResource {
        SerializableResource::new(res, self.human_readable_attributes(res))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Attributes, ResourceFactory, TerraformResourceFactory};

    fn strip_secret(res: &mut AbstractResource) {
        res.attributes_mut().remove("secret");
    }

    fn show_name(res: &AbstractResource) -> BTreeMap<String, String> {
        res.attributes()
            .get_str("name")
            .map(|n| BTreeMap::from([("Name".to_string(), n.to_string())]))
            .unwrap_or_default()
    }

    fn resource() -> AbstractResource {
        let attrs: Attributes = [("name", "n"), ("secret", "s")].into_iter().collect();
        TerraformResourceFactory.create_abstract_resource("google_test", "id", attrs)
    }

    #[test]
    fn test_hooks_apply_to_registered_type() {
        let mut repo = SchemaRepository::new();
        repo.register("google_test");
        repo.set_normalize_func("google_test", strip_secret);
        repo.set_human_readable_attributes_func("google_test", show_name);

        let mut res = resource();
        repo.normalize(&mut res);
        assert!(!res.attributes().contains("secret"));
        assert_eq!(repo.human_readable_attributes(&res)["Name"], "n");
    }

    #[test]
    fn test_setters_ignore_unknown_type() {
        let mut repo = SchemaRepository::new();
        repo.set_flags("google_test", Flags::DEEP_MODE);
        repo.set_normalize_func("google_test", strip_secret);

        assert!(repo.get_schema("google_test").is_none());
        assert!(!repo.is_deep_mode("google_test"));

        let mut res = resource();
        repo.normalize(&mut res);
        assert!(res.attributes().contains("secret"));
        assert!(repo.human_readable_attributes(&res).is_empty());
    }

    #[test]
    fn test_deep_mode_types_sorted() {
        let mut repo = SchemaRepository::new();
        for ty in ["google_b", "google_a", "google_c"] {
            repo.register(ty);
        }
        repo.set_flags("google_c", Flags::DEEP_MODE);
        repo.set_flags("google_a", Flags::DEEP_MODE);

        assert_eq!(repo.deep_mode_types(), vec!["google_a", "google_c"]);
        assert!(!repo.is_deep_mode("google_b"));
    }

    #[test]
    fn test_flags() {
        let mut flags = Flags::empty();
        assert!(!flags.contains(Flags::DEEP_MODE));
        flags.insert(Flags::DEEP_MODE);
        assert!(flags.contains(Flags::DEEP_MODE));
        assert_eq!(Flags::empty() | Flags::DEEP_MODE, Flags::DEEP_MODE);
    }
}
