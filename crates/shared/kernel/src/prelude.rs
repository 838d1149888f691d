//! Common imports for feature slices.

pub use crate::domain::config::ApiConfig;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
pub use crate::security::{AccessError, SharedSecret};

#[cfg(feature = "server")]
pub use crate::server::{ApiMessage, ApiState};
