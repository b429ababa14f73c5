use thiserror::Error;

/// Hook registry errors. Both variants surface during the boot registration
/// phase and are never recovered - they abort startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("hook registry is frozen; plugin '{plugin_id}' cannot register '{hook}' after boot")]
    Frozen { plugin_id: String, hook: String },

    #[error("namespace '{namespace}' is already claimed by plugin '{claimed_by}' (requested by '{plugin_id}')")]
    NamespaceConflict {
        namespace: String,
        claimed_by: String,
        plugin_id: String,
    },
}
