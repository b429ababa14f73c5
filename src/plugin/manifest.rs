use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::capability::PluginTier;

/// A single capability request from a plugin manifest. The token stays a raw
/// string here - manifests come from untrusted plugin packages, so parsing
/// against the vocabulary happens in the enforcer, not at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedCapability {
    pub capability: String,
    pub reason: String,
}

/// Plugin manifest, declared once per plugin package and loaded at boot.
/// Never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub plugin_id: String,
    pub package_name: String,
    pub version: String,
    pub tier: PluginTier,
    #[serde(default)]
    pub requested_capabilities: Vec<RequestedCapability>,
}

impl PluginManifest {
    /// Load a manifest from a YAML file (the `plugin.yaml` shipped in a
    /// plugin package). JSON is valid YAML, so `.json` manifests load too.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read manifest {}: {}", path.display(), e))?;
        Self::from_yaml(&contents)
    }

    /// Parse a manifest from YAML or JSON text
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).map_err(|e| anyhow::anyhow!("invalid plugin manifest: {}", e))
    }

    /// Raw requested tokens, in declaration order
    pub fn requested_tokens(&self) -> Vec<&str> {
        self.requested_capabilities.iter().map(|r| r.capability.as_str()).collect()
    }
}
