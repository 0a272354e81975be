//! Configuration for the bootstrap CLI.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file. The transform
//! library itself never reads the environment; everything is resolved here,
//! once, and passed down explicitly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TransformError};
use crate::transform::{DEFAULT_METADATA_FILE, DEFAULT_TARGET_FILES};

/// Variables naming the jurisdiction, in precedence order.
/// `COUNTRY_NAME` is the legacy spelling.
pub const JURISDICTION_VARS: &[&str] = &["JURISDICTION_NAME", "COUNTRY_NAME"];

/// Default location of the extracted template, relative to the base dir.
pub const DEFAULT_TEMPLATE_ROOT: &str = "openfisca-country-template";

/// Bootstrap configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Jurisdiction identifier, if configured.
    pub jurisdiction: Option<String>,
    /// Which variable supplied `jurisdiction`.
    pub jurisdiction_var: Option<&'static str>,
    /// Extracted template tree.
    pub template_root: PathBuf,
    /// Files outside the package directory to rewrite.
    pub target_files: Vec<String>,
    /// File receiving version and maturity resets.
    pub metadata_file: String,
    /// Package manager program.
    pub pip: String,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    pub fn load(base_dir: &Path) -> Self {
        let mut vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            match dotenvy::from_path_iter(&env_path) {
                Ok(iter) => {
                    for item in iter {
                        match item {
                            Ok((key, value)) => {
                                vars.insert(key, value);
                            }
                            Err(e) => warn!("Ignoring line in {}: {}", env_path.display(), e),
                        }
                    }
                }
                Err(e) => warn!("Could not read {}: {}", env_path.display(), e),
            }
        }

        // Environment variables override .env file
        vars.extend(std::env::vars());

        Self::from_vars(base_dir, &vars)
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(base_dir: &Path, vars: &HashMap<String, String>) -> Self {
        let lookup = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let (jurisdiction_var, jurisdiction) = JURISDICTION_VARS
            .iter()
            .find_map(|var| lookup(*var).map(|value| (*var, value)))
            .unzip();

        if let Some(var) = jurisdiction_var {
            debug!("Jurisdiction identifier taken from {}", var);
        }

        let template_root = lookup("TEMPLATE_ROOT")
            .map(|s| {
                let path = PathBuf::from(s);
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            })
            .unwrap_or_else(|| base_dir.join(DEFAULT_TEMPLATE_ROOT));

        let target_files = lookup("TARGET_FILES")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| DEFAULT_TARGET_FILES.iter().map(|f| f.to_string()).collect());

        let metadata_file =
            lookup("METADATA_FILE").unwrap_or_else(|| DEFAULT_METADATA_FILE.to_string());

        let pip = lookup("PIP").unwrap_or_else(|| "pip".to_string());

        Self {
            jurisdiction,
            jurisdiction_var,
            template_root,
            target_files,
            metadata_file,
            pip,
        }
    }

    /// The jurisdiction identifier, or a configuration error naming the
    /// variables that were consulted.
    pub fn require_jurisdiction(&self) -> Result<&str> {
        self.jurisdiction
            .as_deref()
            .ok_or_else(|| TransformError::EnvironmentMisconfiguration {
                vars: JURISDICTION_VARS.iter().map(|v| v.to_string()).collect(),
            })
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        match (&self.jurisdiction, self.jurisdiction_var) {
            (Some(name), Some(var)) => println!("  {}: {}", var, name),
            _ => println!("  JURISDICTION_NAME: NOT SET"),
        }
        println!("  TEMPLATE_ROOT: {}", self.template_root.display());
        println!("  TARGET_FILES: {}", self.target_files.join(","));
        println!("  METADATA_FILE: {}", self.metadata_file);
        println!("  PIP: {}", self.pip);
        if self.template_root.is_dir() {
            println!("  Template tree: FOUND");
        } else {
            println!("  Template tree: NOT FOUND");
        }
    }
}
