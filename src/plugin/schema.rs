//! Plugin option schemas and option resolution.
//!
//! A schema maps option names to a type and a default. The options a
//! handler sees are the defaults overlaid with `[plugins.config.<name>]`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::log;

/// Declared type of a plugin option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Table,
}

impl OptionType {
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Array,
        Self::Table,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Table => "table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether `value` has this type. Integers are accepted as floats.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Table => value.is_object(),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    #[serde(rename = "type")]
    pub kind: OptionType,
    #[serde(default)]
    pub default: Value,
}

impl OptionSpec {
    pub fn new(kind: OptionType, default: impl Into<Value>) -> Self {
        Self {
            kind,
            default: default.into(),
        }
    }
}

/// Option name -> spec.
pub type ConfigSchema = BTreeMap<String, OptionSpec>;

/// Merge configured options over schema defaults.
///
/// A configured value whose type does not match the schema is reported and
/// replaced by the default. Options the schema does not mention pass through.
pub fn resolve_options(plugin: &str, schema: &ConfigSchema, configured: &Value) -> Value {
    let mut options: Map<String, Value> = schema
        .iter()
        .filter(|(_, spec)| !spec.default.is_null())
        .map(|(key, spec)| (key.clone(), spec.default.clone()))
        .collect();

    if let Value::Object(map) = configured {
        for (key, value) in map {
            match schema.get(key) {
                Some(spec) if !spec.kind.matches(value) => {
                    log!(
                        "warning";
                        "plugin `{}`: option `{}` should be {}, using default",
                        plugin,
                        key,
                        spec.kind
                    );
                }
                _ => {
                    options.insert(key.clone(), value.clone());
                }
            }
        }
    }

    Value::Object(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ConfigSchema {
        let mut schema = ConfigSchema::new();
        schema.insert("wpm".into(), OptionSpec::new(OptionType::Integer, 200));
        schema.insert("label".into(), OptionSpec::new(OptionType::String, "min read"));
        schema
    }

    #[test]
    fn test_defaults_only() {
        let options = resolve_options("rt", &schema(), &Value::Null);
        assert_eq!(options, json!({ "wpm": 200, "label": "min read" }));
    }

    #[test]
    fn test_configured_overrides_default() {
        let options = resolve_options("rt", &schema(), &json!({ "wpm": 250, "extra": true }));
        assert_eq!(options["wpm"], 250);
        assert_eq!(options["label"], "min read");
        assert_eq!(options["extra"], true);
    }

    #[test]
    fn test_type_mismatch_uses_default() {
        let options = resolve_options("rt", &schema(), &json!({ "wpm": "fast" }));
        assert_eq!(options["wpm"], 200);
    }

    #[test]
    fn test_type_matching() {
        assert!(OptionType::Float.matches(&json!(3)));
        assert!(!OptionType::Integer.matches(&json!(3.5)));
        assert!(OptionType::Table.matches(&json!({})));
        assert_eq!(OptionType::from_name("boolean"), Some(OptionType::Boolean));
        assert_eq!(OptionType::from_name("bool"), None);
    }
}
