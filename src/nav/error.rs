use thiserror::Error;

/// Navigation composition errors. All of these are fatal wherever they
/// surface: at boot they abort startup, at request time they abort the
/// request rather than returning an inconsistent tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("duplicate navigation ids: [{}]", ids.join(", "))]
    Collision { ids: Vec<String> },

    #[error("plugin '{plugin_id}' attempted to originate reserved id '{id}'")]
    ReservedIdViolation { plugin_id: String, id: String },

    #[error("plugin '{plugin_id}' filter removed id '{id}' outside its namespace")]
    ForeignRemoval { plugin_id: String, id: String },
}
