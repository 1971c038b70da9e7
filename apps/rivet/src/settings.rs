//! # Settings
//!
//! Optional TOML settings file for the CLI.
//!
//! ```toml
//! [variables]
//! "urn:app:port" = "8080"
//!
//! [resolver]
//! max_depth = 128
//! ```
//!
//! Variables given on the command line with `--var NAME=VALUE` override the
//! file.

use std::collections::BTreeMap;
use std::path::Path;

use rivet_core::vocab::DEFAULT_MAX_DEPTH;
use rivet_core::{Literal, ResolveError, Variables};
use serde::{Deserialize, Serialize};

/// Maximum settings file size (1 MB).
const MAX_SETTINGS_FILE_SIZE: u64 = 1024 * 1024;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Variable values keyed by variable IRI.
    pub variables: BTreeMap<String, String>,
    pub resolver: ResolverSettings,
}

/// Resolver limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverSettings {
    /// Maximum nesting depth of one resolution.
    pub max_depth: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ResolveError> {
        let settings: Self = toml::from_str(text)
            .map_err(|e| ResolveError::DeserializationError(format!("Settings: {e}")))?;
        if settings.resolver.max_depth == 0 {
            return Err(ResolveError::DeserializationError(
                "Settings: resolver.max_depth must be positive".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Load settings from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ResolveError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let metadata = std::fs::metadata(path)
            .map_err(|e| ResolveError::IoError(format!("Cannot read settings '{}': {e}", path.display())))?;
        if metadata.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(ResolveError::IoError(format!(
                "Settings file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_SETTINGS_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ResolveError::IoError(format!("Cannot read settings '{}': {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Self::from_toml(&text)
    }

    /// Apply `NAME=VALUE` overrides from the command line.
    pub fn apply_overrides(&mut self, overrides: &[String]) -> Result<(), ResolveError> {
        for assignment in overrides {
            let (name, value) = assignment
                .split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| {
                    ResolveError::DeserializationError(format!(
                        "Invalid variable '{assignment}': expected NAME=VALUE"
                    ))
                })?;
            self.variables.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    /// The configured variables as plain string literals.
    #[must_use]
    pub fn variables(&self) -> Variables {
        self.variables
            .iter()
            .map(|(name, value)| (name.clone(), Literal::string(value.clone())))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
