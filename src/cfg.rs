use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{apriori::ReferencePositions, orbit::KeplerSolver, time::TimeOrigins};

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reference vectors format
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma separated (key, value) text lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

fn default_revisions() -> Vec<String> {
    vec!["V2".to_string(), "V3".to_string()]
}

fn default_nav_directory() -> String {
    "NAV".to_string()
}

fn default_output_directory() -> String {
    "gr".to_string()
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Week counter origin, per constellation
    pub time_origins: TimeOrigins,
    /// Revision folders we process, others are ignored
    pub revisions: Vec<String>,
    /// Navigation data folder, within the base directory
    pub nav_directory: String,
    /// Reference vectors folder, within the base directory
    pub output_directory: String,
    pub output_format: OutputFormat,
    pub reference_positions: ReferencePositions,
    pub kepler: KeplerSolver,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_origins: TimeOrigins::default(),
            revisions: default_revisions(),
            nav_directory: default_nav_directory(),
            output_directory: default_output_directory(),
            output_format: OutputFormat::default(),
            reference_positions: ReferencePositions::default(),
            kepler: KeplerSolver::default(),
        }
    }
}

impl Config {
    /// Loads [Config] from JSON file. Omitted fields take default values.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
    /// True if this revision folder should be processed
    pub fn supported_revision(&self, revision: &str) -> bool {
        self.revisions.iter().any(|rev| rev == revision)
    }
}
