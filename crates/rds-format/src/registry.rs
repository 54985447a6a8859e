use rds_types::{ConfigMap, Value};

use crate::error::{FormatError, FormatResult};
use crate::json::JsonFormat;
use crate::toml_format::TomlFormat;
use crate::traits::Format;

/// One registered format: its name, configuration template, and constructor.
pub struct FormatEntry {
    pub name: &'static str,
    /// Option name to default value; empty when the format takes no options.
    pub template: fn() -> ConfigMap,
    pub build: fn(&ConfigMap) -> FormatResult<Box<dyn Format>>,
}

impl std::fmt::Debug for FormatEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatEntry")
            .field("name", &self.name)
            .finish()
    }
}

/// All known formats. Fixed at compile time.
pub static FORMATS: &[FormatEntry] = &[
    FormatEntry {
        name: JsonFormat::NAME,
        template: JsonFormat::template,
        build: JsonFormat::boxed,
    },
    FormatEntry {
        name: TomlFormat::NAME,
        template: TomlFormat::template,
        build: TomlFormat::boxed,
    },
];

/// Find a registered format by name.
pub fn lookup_format(name: &str) -> Option<&'static FormatEntry> {
    FORMATS.iter().find(|entry| entry.name == name)
}

/// Names of all registered formats, in registration order.
pub fn format_names() -> Vec<&'static str> {
    FORMATS.iter().map(|entry| entry.name).collect()
}

/// Reject any option not named in `allowed`.
pub(crate) fn check_options(config: &ConfigMap, allowed: &[&str]) -> FormatResult<()> {
    match config.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(FormatError::Config(format!("unknown option \"{key}\""))),
        None => Ok(()),
    }
}

/// Read an optional boolean option.
pub(crate) fn bool_option(config: &ConfigMap, key: &str, default: bool) -> FormatResult<bool> {
    match config.get(key) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(FormatError::Config(format!(
            "option \"{key}\" must be a boolean, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_in_registration_order() {
        assert_eq!(format_names(), vec!["json", "toml"]);
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert_eq!(lookup_format("json").unwrap().name, "json");
        assert!(lookup_format("xml").is_none());
        assert!(lookup_format("JSON").is_none());
    }

    #[test]
    fn build_from_template_succeeds() {
        for entry in FORMATS {
            let format = (entry.build)(&(entry.template)()).unwrap();
            assert_eq!(format.name(), entry.name);
        }
    }

    #[test]
    fn unknown_option_is_rejected() {
        let config = json!({"indent": 4}).as_object().cloned().unwrap();
        let err = (lookup_format("json").unwrap().build)(&config).err().unwrap();
        assert!(matches!(err, FormatError::Config(_)));
    }

    #[test]
    fn bool_option_type_is_checked() {
        let config = json!({"pretty": "yes"}).as_object().cloned().unwrap();
        assert!(matches!(
            bool_option(&config, "pretty", false),
            Err(FormatError::Config(_))
        ));
        assert!(!bool_option(&ConfigMap::new(), "pretty", false).unwrap());
    }
}
