//! Configuration Management
//!
//! Persistent settings for gcp-inventory, stored as JSON under the user's
//! config directory. Command line flags override the file; the file
//! overrides environment and gcloud defaults.

use crate::gcp::auth;
use crate::gcp::client::DEFAULT_PAGE_SIZE;
use crate::remote::scanner::DEFAULT_MAX_CONCURRENCY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Project to scan when no scope is given
    #[serde(default)]
    pub project_id: Option<String>,
    /// `projects/<id>`, `folders/<id>` or `organizations/<id>`
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Config {
    /// `<config dir>/gcp-inventory`
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcp-inventory"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring configuration file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Configured project, else the environment / gcloud default
    ///
    /// Malformed project ids are discarded.
    pub fn effective_project(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(auth::get_default_project)
            .filter(|p| {
                let valid = auth::validate_project_id(p);
                if !valid {
                    tracing::warn!("Ignoring invalid project id: {}", p);
                }
                valid
            })
    }

    /// Scopes to search, `projects/<effective project>` when none are set
    pub fn scan_scopes(&self) -> Vec<String> {
        if !self.scopes.is_empty() {
            return self.scopes.clone();
        }
        self.effective_project()
            .map(|p| vec![format!("projects/{}", p)])
            .unwrap_or_default()
    }

    /// Projects whose IAM policy is read
    ///
    /// `projects/` scopes when any are configured, else the effective
    /// project, so folder and organization scans still cover it.
    pub fn scan_projects(&self) -> Vec<String> {
        let scoped: Vec<String> = self
            .scopes
            .iter()
            .filter_map(|s| s.strip_prefix("projects/"))
            .map(str::to_string)
            .collect();
        if !scoped.is_empty() {
            return scoped;
        }

        let projects: Vec<String> = self.effective_project().into_iter().collect();
        if projects.is_empty() {
            tracing::warn!("No project configured, project IAM policies will not be listed");
        }
        projects
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gcp-inventory-test-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_scopes_take_precedence() {
        let config = Config {
            project_id: Some("my-project-1".into()),
            scopes: vec!["projects/other-project".into(), "folders/123".into()],
            ..Default::default()
        };

        assert_eq!(config.scan_scopes(), vec!["projects/other-project", "folders/123"]);
        assert_eq!(config.scan_projects(), vec!["other-project"]);
    }

    #[test]
    fn test_folder_scopes_fall_back_to_project() {
        let config = Config {
            project_id: Some("my-project-1".into()),
            scopes: vec!["folders/123".into(), "organizations/42".into()],
            ..Default::default()
        };

        assert_eq!(config.scan_scopes(), vec!["folders/123", "organizations/42"]);
        assert_eq!(config.scan_projects(), vec!["my-project-1"]);
    }

    #[test]
    fn test_project_fallback_scope() {
        let config = Config {
            project_id: Some("my-project-1".into()),
            ..Default::default()
        };

        assert_eq!(config.scan_scopes(), vec!["projects/my-project-1"]);
        assert_eq!(config.scan_projects(), vec!["my-project-1"]);
    }

    #[test]
    fn test_defaults() {
        let config = Config {
            max_concurrency: Some(0),
            ..Default::default()
        };
        assert_eq!(config.max_concurrency(), 1);
        assert_eq!(Config::default().max_concurrency(), DEFAULT_MAX_CONCURRENCY);
        assert_eq!(Config::default().page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("config.json");
        let config = Config {
            project_id: Some("my-project-1".into()),
            scopes: vec!["organizations/42".into()],
            zone: Some("europe-west1-b".into()),
            page_size: Some(100),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_load_partial_file() {
        let path = temp_path("config.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"project_id":"my-project-1"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.project_id.as_deref(), Some("my-project-1"));
        assert!(config.scopes.is_empty());

        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
