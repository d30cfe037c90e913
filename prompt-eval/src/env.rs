//! `.env` loading for API keys.

use std::path::{Path, PathBuf};

use crate::error::{EvalError, EvalResult};

/// Loads `.env` from the working directory or the nearest parent holding one.
///
/// Returns the file that was loaded, or `None` when there is no such file.
///
/// # Errors
///
/// Returns [`EvalError::EnvFile`] if a file was found but could not be read
/// or parsed.
pub fn load_dotenv() -> EvalResult<Option<PathBuf>> {
    found(dotenvy::dotenv())
}

/// Loads the environment file at `path`.
///
/// Returns `false` when the file does not exist.
///
/// # Errors
///
/// Same as [`load_dotenv`].
pub fn load_dotenv_from(path: impl AsRef<Path>) -> EvalResult<bool> {
    found(dotenvy::from_path(path.as_ref())).map(|loaded| loaded.is_some())
}

fn found<T>(result: dotenvy::Result<T>) -> EvalResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.not_found() => Ok(None),
        Err(source) => Err(EvalError::EnvFile { source }),
    }
}
