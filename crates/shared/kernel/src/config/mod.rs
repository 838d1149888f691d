use crate::domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX, ENV_SEPARATOR};
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

#[rollcall_derive::rollcall_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from an optional file overlaid with `ROLLCALL__*` environment variables.
///
/// Layers, lowest priority first:
/// 1. **File**: `path` when given (must exist), otherwise `server.toml` in the working
///    directory if present.
/// 2. **Environment**: nested keys joined with `__`, e.g. `ROLLCALL__DATABASE__URL`
///    maps to `database.url`.
///
/// Fields missing from every layer keep the `#[serde(default)]` values of `T`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or unreadable, or
/// if the merged values do not fit `T`.
///
/// # Example
/// ```rust,no_run
/// use rollcall_kernel::config::load_config;
/// use std::path::Path;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some(Path::new("config/local.toml"))).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.to_path_buf(), true),
    );

    info!(path = %effective_path.display(), required, "Loading config");

    Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
