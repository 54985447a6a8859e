use rds_types::{ConfigMap, Record, Value};

use crate::error::{FormatError, FormatResult};
use crate::registry::{bool_option, check_options};
use crate::traits::Format;

/// JSON storage format.
///
/// Keys are written in sorted order. With `pretty` enabled the payload is
/// indented; either layout decodes to the same record, but the two layouts
/// produce different bytes and therefore different record identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    pub const NAME: &'static str = "json";

    /// Compact JSON.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn template() -> ConfigMap {
        let mut conf = ConfigMap::new();
        conf.insert("pretty".into(), Value::Bool(false));
        conf
    }

    pub fn from_config(config: &ConfigMap) -> FormatResult<Self> {
        check_options(config, &["pretty"])?;
        Ok(Self {
            pretty: bool_option(config, "pretty", false)?,
        })
    }

    pub fn boxed(config: &ConfigMap) -> FormatResult<Box<dyn Format>> {
        Ok(Box::new(Self::from_config(config)?))
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn serialize(&self, record: &Record) -> FormatResult<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(record)
        } else {
            serde_json::to_vec(record)
        };
        encoded.map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn deserialize(&self, payload: &[u8]) -> FormatResult<Record> {
        serde_json::from_slice(payload).map_err(|e| FormatError::Deserialization(e.to_string()))
    }
}
