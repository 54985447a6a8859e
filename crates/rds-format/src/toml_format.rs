use rds_types::{ConfigMap, Record};

use crate::error::{FormatError, FormatResult};
use crate::registry::check_options;
use crate::traits::Format;

/// TOML storage format.
///
/// TOML has no null, so records holding `null` anywhere fail to serialize.
/// Integers must fit in an `i64`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TomlFormat;

impl TomlFormat {
    pub const NAME: &'static str = "toml";

    pub fn new() -> Self {
        Self
    }

    pub fn template() -> ConfigMap {
        ConfigMap::new()
    }

    pub fn from_config(config: &ConfigMap) -> FormatResult<Self> {
        check_options(config, &[])?;
        Ok(Self)
    }

    pub fn boxed(config: &ConfigMap) -> FormatResult<Box<dyn Format>> {
        Ok(Box::new(Self::from_config(config)?))
    }
}

impl Format for TomlFormat {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn serialize(&self, record: &Record) -> FormatResult<Vec<u8>> {
        toml::to_string(record)
            .map(String::into_bytes)
            .map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn deserialize(&self, payload: &[u8]) -> FormatResult<Record> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| FormatError::Deserialization(format!("payload is not UTF-8: {e}")))?;
        toml::from_str(text).map_err(|e| FormatError::Deserialization(e.to_string()))
    }
}
