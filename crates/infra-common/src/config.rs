//! Loading serde-described configuration from TOML

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{ErrorContext, ErrorExt, Result};

/// Parse a configuration value from TOML text
pub fn parse_toml<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(toml::from_str(text)?)
}

/// Read and parse a TOML configuration file
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let ctx = || ErrorContext::new("config", "load_toml").with_details(path.display().to_string());

    let text = std::fs::read_to_string(path)
        .map_err(crate::Error::from)
        .context(ctx())?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Loaded configuration file");
    parse_toml(&text).context(ctx())
}
