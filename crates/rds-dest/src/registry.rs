use rds_types::ConfigMap;

use crate::error::{DestinationError, DestinationResult};
use crate::local::LocalDrive;
use crate::memory::InMemoryDestination;
use crate::traits::Destination;

/// One registered destination: its name, configuration template, and constructor.
///
/// `build` only validates configuration; the caller runs
/// [`Destination::init`] before first use.
pub struct DestinationEntry {
    pub name: &'static str,
    /// Option name to example value, e.g. `{"path": "./records"}`.
    pub template: fn() -> ConfigMap,
    pub build: fn(&ConfigMap) -> DestinationResult<Box<dyn Destination>>,
}

impl std::fmt::Debug for DestinationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationEntry")
            .field("name", &self.name)
            .finish()
    }
}

/// All known destinations. Fixed at compile time.
pub static DESTINATIONS: &[DestinationEntry] = &[
    DestinationEntry {
        name: LocalDrive::NAME,
        template: LocalDrive::template,
        build: LocalDrive::boxed,
    },
    DestinationEntry {
        name: InMemoryDestination::NAME,
        template: InMemoryDestination::template,
        build: InMemoryDestination::boxed,
    },
];

/// Find a registered destination by name.
pub fn lookup_destination(name: &str) -> Option<&'static DestinationEntry> {
    DESTINATIONS.iter().find(|entry| entry.name == name)
}

/// Names of all registered destinations, in registration order.
pub fn destination_names() -> Vec<&'static str> {
    DESTINATIONS.iter().map(|entry| entry.name).collect()
}

/// Reject any option not named in `allowed`.
pub(crate) fn check_options(config: &ConfigMap, allowed: &[&str]) -> DestinationResult<()> {
    match config.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(DestinationError::Config(format!("unknown option \"{key}\""))),
        None => Ok(()),
    }
}
