// Navigation composition: the model types and the six-stage builder that
// assembles them from the baseline plus plugin filter chains

pub mod builder;
pub mod error;
pub mod model;

pub use builder::*;
pub use error::*;
pub use model::*;
