use std::fs;
use std::path::Path;

use rds_dest::{destination_names, lookup_destination};
use rds_format::{format_names, lookup_format};
use rds_types::ConfigMap;
use serde::{Deserialize, Serialize};

use crate::error::{DataStoreError, DataStoreResult};

/// Everything needed to open a [`DataStore`](crate::DataStore).
///
/// The two configuration maps are opaque here; each capability validates its
/// own when it is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataStoreConfig {
    pub format_name: String,
    #[serde(default)]
    pub format_conf: ConfigMap,
    pub destination_name: String,
    #[serde(default)]
    pub destination_conf: ConfigMap,
}

impl Default for DataStoreConfig {
    /// JSON records on the local drive under `./records`.
    fn default() -> Self {
        Self {
            format_name: "json".into(),
            format_conf: rds_format::JsonFormat::template(),
            destination_name: "localdrive".into(),
            destination_conf: rds_dest::LocalDrive::template(),
        }
    }
}

impl DataStoreConfig {
    /// Read a configuration file. `.toml` files are parsed as TOML,
    /// anything else as JSON.
    pub fn load(path: &Path) -> DataStoreResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DataStoreError::Config(format!("{}: {e}", path.display())))?;
        if is_toml(path) {
            toml::from_str(&text)
                .map_err(|e| DataStoreError::Config(format!("{}: {e}", path.display())))
        } else {
            serde_json::from_str(&text)
                .map_err(|e| DataStoreError::Config(format!("{}: {e}", path.display())))
        }
    }

    /// Write this configuration, choosing the encoding by extension like [`load`](Self::load).
    pub fn save(&self, path: &Path) -> DataStoreResult<()> {
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_json()?
        };
        fs::write(path, text)
            .map_err(|e| DataStoreError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_toml(&self) -> DataStoreResult<String> {
        toml::to_string(self).map_err(|e| DataStoreError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> DataStoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DataStoreError::Config(e.to_string()))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Names of every registered format and destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Supported {
    pub formats: Vec<&'static str>,
    pub destinations: Vec<&'static str>,
}

/// List the registered formats and destinations.
pub fn supported() -> Supported {
    Supported {
        formats: format_names(),
        destinations: destination_names(),
    }
}

/// Build a configuration template for a format/destination pair.
///
/// The result can be passed straight to
/// [`DataStore::from_config`](crate::DataStore::from_config) or saved and
/// edited first.
pub fn generate_configuration(
    format_name: &str,
    destination_name: &str,
) -> DataStoreResult<DataStoreConfig> {
    let format = lookup_format(format_name)
        .ok_or_else(|| DataStoreError::UnsupportedFormat(format_name.to_string()))?;
    let destination = lookup_destination(destination_name)
        .ok_or_else(|| DataStoreError::UnsupportedDestination(destination_name.to_string()))?;
    Ok(DataStoreConfig {
        format_name: format.name.to_string(),
        format_conf: (format.template)(),
        destination_name: destination.name.to_string(),
        destination_conf: (destination.template)(),
    })
}
