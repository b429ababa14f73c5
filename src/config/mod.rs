use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::entitlement::CoverageLimits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub verifier: VerifierConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Maximum pairwise entitlement combinations generated at boot
    pub pair_cap: usize,
    /// Full power-set generation only at or below this capability count
    pub powerset_threshold: usize,
    /// Log every generated sample label during boot verification
    pub log_samples: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Priority assigned to hooks registered without one
    pub default_priority: u8,
}

impl VerifierConfig {
    pub fn limits(&self) -> CoverageLimits {
        CoverageLimits {
            pair_cap: self.pair_cap,
            powerset_threshold: self.powerset_threshold,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("VERIFIER_PAIR_CAP") {
            self.verifier.pair_cap = v.parse().unwrap_or(self.verifier.pair_cap);
        }
        if let Ok(v) = env::var("VERIFIER_POWERSET_THRESHOLD") {
            self.verifier.powerset_threshold = v.parse().unwrap_or(self.verifier.powerset_threshold);
        }
        if let Ok(v) = env::var("VERIFIER_LOG_SAMPLES") {
            self.verifier.log_samples = v.parse().unwrap_or(self.verifier.log_samples);
        }
        if let Ok(v) = env::var("REGISTRY_DEFAULT_PRIORITY") {
            self.registry.default_priority = v.parse().unwrap_or(self.registry.default_priority);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            verifier: VerifierConfig {
                pair_cap: 512,
                powerset_threshold: 8,
                log_samples: true,
            },
            registry: RegistryConfig { default_priority: 50 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            verifier: VerifierConfig {
                pair_cap: 512,
                powerset_threshold: 8,
                log_samples: false,
            },
            registry: RegistryConfig { default_priority: 50 },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            verifier: VerifierConfig {
                pair_cap: 512,
                powerset_threshold: 8,
                log_samples: false,
            },
            registry: RegistryConfig { default_priority: 50 },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
