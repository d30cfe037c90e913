//! YAML loaders for the configuration documents.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{AgentsConfig, ModelsConfig};

/// Parses a YAML document. `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text does not match `T`.
pub fn from_yaml_str<T: DeserializeOwned>(origin: &str, text: &str) -> ConfigResult<T> {
    serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_owned(),
        source,
    })
}

/// Reads and parses a YAML file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it does not match `T`.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&path.display().to_string(), &text)
}

/// Loads and validates `models.yaml`.
///
/// # Errors
///
/// Returns the errors of [`read_yaml`] and [`ModelsConfig::validate`].
pub fn load_models(path: impl AsRef<Path>) -> ConfigResult<ModelsConfig> {
    let path = path.as_ref();
    let models: ModelsConfig = read_yaml(path)?;
    models.validate()?;
    debug!(path = %path.display(), count = models.models.len(), "loaded models config");
    Ok(models)
}

/// Loads `agents.yaml` and validates it against `models`.
///
/// # Errors
///
/// Returns the errors of [`read_yaml`] and [`AgentsConfig::validate`].
pub fn load_agents(path: impl AsRef<Path>, models: &ModelsConfig) -> ConfigResult<AgentsConfig> {
    let path = path.as_ref();
    let agents: AgentsConfig = read_yaml(path)?;
    agents.validate(models)?;
    debug!(path = %path.display(), count = agents.agents.len(), "loaded agents config");
    Ok(agents)
}
