use thiserror::Error;

/// Capability system errors with structured error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("plugin '{plugin_id}' does not have capability '{capability}'")]
    Denied { plugin_id: String, capability: String },

    #[error("unknown capability '{0}' is not in the vocabulary")]
    UnknownCapability(String),
}
