use std::path::Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::constants::MAX_STATION_PATHS;
use crate::error::Result;
use crate::signals::SignalFunction;

fn default_max_station_paths() -> usize {
    MAX_STATION_PATHS
}

/// Settings shared by the signal builder and the station path explorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Hard cap on concurrent paths per station exploration
    #[serde(default = "default_max_station_paths")]
    pub max_station_paths: usize,
    /// Signal type name -> function; empty means every head is a normal signal
    #[serde(default)]
    pub signal_types: IndexMap<String, SignalFunction>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            max_station_paths: MAX_STATION_PATHS,
            signal_types: IndexMap::new(),
        }
    }
}

impl RouteConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Function of a signal type, `None` if the configured table does not know it
    #[must_use]
    pub fn signal_function(&self, signal_type: &str) -> Option<SignalFunction> {
        if self.signal_types.is_empty() {
            return Some(SignalFunction::Normal);
        }
        self.signal_types.get(signal_type).copied()
    }
}
