//! TOML plugin manifests.
//!
//! # Example
//!
//! ```toml
//! name = "reading-time"
//! version = "1.2.0"
//! dependencies = ["word-count"]
//!
//! [config_schema.words_per_minute]
//! type = "integer"
//! default = 200
//!
//! [hooks]
//! afterContentParse = ["./reading-time.sh"]
//! afterBuild = { command = ["node", "report.js", "$PLUME_OUTPUT_DIR"], quiet = false }
//! ```
//!
//! Relative programs (`./x`, `../x`) resolve against the manifest's
//! directory. A manifest that cannot be read or parsed is a load error; one
//! with fields of the wrong shape is a validation error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::{CommandHook, ConfigSchema, OptionSpec, OptionType, Plugin, PluginError};
use crate::content::toml_to_json;
use crate::hooks::{Handler, Hook};
use crate::log;

/// Plugin defined by a manifest; every hook runs a command.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestPlugin {
    pub name: String,
    pub version: String,
    pub dependencies: Vec<String>,
    pub schema: ConfigSchema,
    pub commands: Vec<CommandHook>,
}

impl Plugin for ManifestPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn config_schema(&self) -> ConfigSchema {
        self.schema.clone()
    }

    fn hooks(&self) -> Vec<(Hook, Handler)> {
        self.commands
            .iter()
            .cloned()
            .map(|cmd| (cmd.hook, cmd.into_handler()))
            .collect()
    }
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<ManifestPlugin, PluginError> {
    let content = fs::read_to_string(path).map_err(|e| {
        let message = if e.kind() == io::ErrorKind::NotFound {
            "manifest not found".to_string()
        } else {
            e.to_string()
        };
        PluginError::load(path, message)
    })?;
    parse_manifest(path, &content)
}

/// Parse manifest text. `path` names the plugin in errors and anchors
/// relative programs.
pub fn parse_manifest(path: &Path, content: &str) -> Result<ManifestPlugin, PluginError> {
    let table: Table = content
        .parse()
        .map_err(|e: toml::de::Error| PluginError::load(path, e.message().to_string()))?;
    if table.is_empty() {
        return Err(PluginError::load(path, "manifest defines nothing"));
    }

    let label = path.display().to_string();
    let invalid = |message: String| PluginError::validation(&label, message);

    let name = required_string(&table, "name").map_err(invalid)?;
    let invalid = |message: String| PluginError::validation(&name, message);
    let version = required_string(&table, "version").map_err(invalid)?;
    let dependencies = string_list(table.get("dependencies"), "dependencies").map_err(invalid)?;

    let schema_value = table.get("config_schema").or_else(|| table.get("configSchema"));
    let schema = parse_schema(schema_value).map_err(invalid)?;

    let base = path.parent().unwrap_or(Path::new("."));
    let commands = parse_hooks(table.get("hooks"), base).map_err(invalid)?;

    for cmd in &commands {
        warn_if_missing(&name, cmd);
    }

    Ok(ManifestPlugin {
        name,
        version,
        dependencies,
        schema,
        commands,
    })
}

fn required_string(table: &Table, key: &str) -> Result<String, String> {
    match table.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(format!("`{key}` is empty")),
        Some(other) => Err(format!("`{key}` must be a string, found {}", other.type_str())),
        None => Err(format!("`{key}` is missing")),
    }
}

fn string_list(value: Option<&Value>, what: &str) -> Result<Vec<String>, String> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = value else {
        return Err(format!("`{what}` must be an array of strings"));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) if !s.is_empty() => Ok(s.clone()),
            _ => Err(format!("`{what}` must only contain non-empty strings")),
        })
        .collect()
}

fn parse_schema(value: Option<&Value>) -> Result<ConfigSchema, String> {
    let Some(value) = value else {
        return Ok(ConfigSchema::new());
    };
    let Value::Table(table) = value else {
        return Err("`config_schema` must be a table".to_string());
    };

    let mut schema = ConfigSchema::new();
    for (option, spec) in table {
        let Value::Table(spec) = spec else {
            return Err(format!("`config_schema.{option}` must be a table with `type`"));
        };
        let kind = match spec.get("type") {
            Some(Value::String(t)) => OptionType::from_name(t)
                .ok_or_else(|| format!("`config_schema.{option}` has unknown type `{t}`"))?,
            _ => return Err(format!("`config_schema.{option}.type` must be a string")),
        };
        let default = spec
            .get("default")
            .cloned()
            .map(toml_to_json)
            .unwrap_or(serde_json::Value::Null);
        if !default.is_null() && !kind.matches(&default) {
            return Err(format!("`config_schema.{option}.default` does not match type `{kind}`"));
        }
        schema.insert(option.clone(), OptionSpec { kind, default });
    }
    Ok(schema)
}

fn parse_hooks(value: Option<&Value>, base: &Path) -> Result<Vec<CommandHook>, String> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::Table(table) = value else {
        return Err("`hooks` must be a table".to_string());
    };

    let mut commands = Vec::with_capacity(table.len());
    for (key, spec) in table {
        let hook: Hook = key.parse()?;
        let what = format!("hooks.{key}");
        let (command, quiet) = match spec {
            Value::Array(_) => (string_list(Some(spec), &what)?, true),
            Value::Table(t) => {
                let command = string_list(t.get("command"), &format!("{what}.command"))?;
                let quiet = match t.get("quiet") {
                    None => true,
                    Some(Value::Boolean(b)) => *b,
                    Some(_) => return Err(format!("`{what}.quiet` must be a boolean")),
                };
                (command, quiet)
            }
            _ => return Err(format!("`{what}` must be a command array or a table")),
        };
        if command.is_empty() {
            return Err(format!("`{what}` has no command"));
        }
        commands.push(CommandHook {
            hook,
            command: anchor_program(command, base),
            quiet,
        });
    }
    Ok(commands)
}

/// Make `./x` and `../x` programs relative to the manifest directory.
fn anchor_program(mut command: Vec<String>, base: &Path) -> Vec<String> {
    if let Some(program) = command.first_mut()
        && (program.starts_with("./") || program.starts_with("../"))
    {
        *program = base.join(&*program).display().to_string();
    }
    command
}

fn warn_if_missing(plugin: &str, cmd: &CommandHook) {
    let program = cmd.program();
    let exists = if Path::new(program).components().count() > 1 {
        PathBuf::from(program).exists()
    } else {
        which::which(program).is_ok()
    };
    if !exists {
        log!("warning"; "plugin `{}`: `{}` for `{}` not found", plugin, program, cmd.hook);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ManifestPlugin, PluginError> {
        parse_manifest(Path::new("/site/plugins/demo.toml"), content)
    }

    fn validation_message(content: &str) -> String {
        match parse(content) {
            Err(PluginError::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_full_manifest() {
        let plugin = parse(
            r#"
name = "reading-time"
version = "1.0.0"
dependencies = ["words"]

[config_schema.wpm]
type = "integer"
default = 200

[hooks]
afterMarkdown = ["sh", "-c", "cat"]
afterBuild = { command = ["./report.sh"], quiet = false }
"#,
        )
        .unwrap();

        assert_eq!(plugin.name, "reading-time");
        assert_eq!(plugin.dependencies, vec!["words"]);
        assert_eq!(plugin.schema["wpm"].default, serde_json::json!(200));
        assert_eq!(plugin.commands.len(), 2);

        let build = plugin.commands.iter().find(|c| c.hook == Hook::AfterBuild).unwrap();
        assert!(!build.quiet);
        assert_eq!(build.command[0], "/site/plugins/./report.sh");
        assert_eq!(plugin.hooks().len(), 2);
    }

    #[test]
    fn test_invalid_toml_is_load_error() {
        assert!(matches!(parse("name = "), Err(PluginError::Load { .. })));
        assert!(matches!(parse(""), Err(PluginError::Load { .. })));
    }

    #[test]
    fn test_missing_manifest_is_load_error() {
        let err = load_manifest(Path::new("/definitely/not/here/plugin.toml")).unwrap_err();
        assert!(matches!(err, PluginError::Load { .. }));
    }

    #[test]
    fn test_name_and_version_required() {
        assert!(validation_message("version = \"1\"").contains("`name` is missing"));
        assert!(validation_message("name = \"x\"").contains("`version` is missing"));
        assert!(validation_message("name = 3\nversion = \"1\"").contains("must be a string"));
        assert!(validation_message("name = \"x\"\nversion = 1.0").contains("must be a string"));
    }

    #[test]
    fn test_shape_errors() {
        let base = "name = \"x\"\nversion = \"1\"\n";
        assert!(validation_message(&format!("{base}dependencies = \"a\"")).contains("dependencies"));
        assert!(validation_message(&format!("{base}hooks = [1]")).contains("`hooks` must be a table"));
        assert!(validation_message(&format!("{base}[hooks]\nonLaunch = [\"x\"]")).contains("unknown hook"));
        assert!(validation_message(&format!("{base}[hooks]\nafterBuild = []")).contains("no command"));
        assert!(
            validation_message(&format!("{base}[config_schema.n]\ntype = \"integer\"\ndefault = \"ten\""))
                .contains("does not match type")
        );
        assert!(validation_message(&format!("{base}[config_schema.n]\ntype = \"date\"")).contains("unknown type"));
    }

    #[test]
    fn test_camel_case_schema_key() {
        let plugin = parse("name = \"x\"\nversion = \"1\"\n[configSchema.flag]\ntype = \"boolean\"\n").unwrap();
        assert_eq!(plugin.schema["flag"].kind, OptionType::Boolean);
    }
}
