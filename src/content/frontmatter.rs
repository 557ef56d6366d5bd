//! Front matter parsing for markdown content.
//!
//! Two formats are recognised, selected by the delimiter on the first line:
//!
//! | Delimiter | Format | Parser       |
//! |-----------|--------|--------------|
//! | `---`     | YAML   | `serde_yaml` |
//! | `+++`     | TOML   | `toml`       |
//!
//! A file without a delimiter has empty front matter and the whole file is
//! its body. An opening delimiter without a matching closing line is an error.

use serde::{Deserialize, Deserializer, Serialize};

/// JSON object holding custom front-matter fields.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Front matter delimiter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    pub const fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }

    fn from_line(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Metadata block at the top of a content file.
///
/// # Standard Fields
///
/// | Field         | Type          | Notes                                  |
/// |---------------|---------------|----------------------------------------|
/// | `title`       | string        |                                        |
/// | `slug`        | string        | overrides the filename-derived slug    |
/// | `date`        | string        | `YYYY-MM-DD` or a date-time            |
/// | `draft`       | bool          | `"true"`/`"yes"` strings accepted      |
/// | `tags`        | list / string | a string is split on commas            |
/// | `permalink`   | string        | overrides the collection template      |
/// | `layout`      | string        | overrides the collection layout        |
/// | `excerpt`     | string        | overrides the first-paragraph excerpt  |
///
/// Everything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub draft: bool,
    #[serde(deserialize_with = "string_or_list")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl FrontMatter {
    /// Look up any field by name, standard or custom.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        use serde_json::Value;
        let text = |s: &Option<String>| s.clone().map(Value::String);
        match key {
            "title" => text(&self.title),
            "slug" => text(&self.slug),
            "date" => text(&self.date),
            "draft" => Some(Value::Bool(self.draft)),
            "tags" => Some(Value::from(self.tags.clone())),
            "permalink" => text(&self.permalink),
            "layout" => text(&self.layout),
            "excerpt" => text(&self.excerpt),
            "author" => text(&self.author),
            "description" => text(&self.description),
            "image" => text(&self.image),
            _ => self.extra.get(key).cloned(),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Split `content` into its front matter block and body.
///
/// Returns `Ok(None)` when the file has no front matter.
pub fn split_front_matter(content: &str) -> Result<Option<(FrontMatterFormat, &str, &str)>, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_end = content.find('\n').unwrap_or(content.len());
    let Some(format) = FrontMatterFormat::from_line(&content[..first_end]) else {
        return Ok(None);
    };

    let rest = content.get(first_end + 1..).unwrap_or_default();
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == format.delimiter() {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((format, front, body)));
        }
        offset += line.len();
    }

    Err(format!(
        "front matter opened with `{}` is never closed",
        format.delimiter()
    ))
}

/// Parse front matter and return it with the remaining body.
pub fn parse_front_matter(content: &str) -> Result<(FrontMatter, &str), String> {
    let Some((format, front, body)) = split_front_matter(content)? else {
        return Ok((FrontMatter::default(), content));
    };

    let value = match format {
        FrontMatterFormat::Yaml => parse_yaml(front)?,
        FrontMatterFormat::Toml => parse_toml(front)?,
    };
    let front_matter =
        serde_json::from_value(value).map_err(|e| format!("invalid front matter field: {e}"))?;
    Ok((front_matter, body))
}

fn parse_yaml(front: &str) -> Result<serde_json::Value, String> {
    if front.trim().is_empty() {
        return Ok(serde_json::Value::Object(JsonMap::new()));
    }
    let value: serde_json::Value =
        serde_yaml::from_str(front).map_err(|e| format!("invalid YAML front matter: {e}"))?;
    match value {
        serde_json::Value::Object(_) => Ok(value),
        serde_json::Value::Null => Ok(serde_json::Value::Object(JsonMap::new())),
        _ => Err("YAML front matter must be a mapping".to_string()),
    }
}

fn parse_toml(front: &str) -> Result<serde_json::Value, String> {
    let table: toml::Table =
        toml::from_str(front).map_err(|e| format!("invalid TOML front matter: {e}"))?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Convert TOML to JSON, rendering datetimes as their TOML text.
pub fn toml_to_json(value: toml::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

// ============================================================================
// Field deserializers
// ============================================================================

/// Accept strings, numbers and booleans as text; null as absent.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// `true`, `"true"`, `"yes"`, `"1"` and non-zero numbers are true.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// A list of scalars, or one comma-separated string. Empty entries dropped.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    let scalar = |v: Value| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    };
    let raw: Vec<String> = match Value::deserialize(deserializer)? {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items.into_iter().filter_map(scalar).collect(),
        _ => Vec::new(),
    };
    Ok(raw
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_front_matter() {
        let content = "---\ntitle: Hello\ndate: 2024-05-06\ntags: [Rust, \"Web Dev\"]\nseries: intro\n---\n# Body\n";
        let (fm, body) = parse_front_matter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.date.as_deref(), Some("2024-05-06"));
        assert_eq!(fm.tags, vec!["Rust", "Web Dev"]);
        assert_eq!(fm.extra["series"], "intro");
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_toml_front_matter() {
        let content = "+++\ntitle = \"Hello\"\ndate = 2024-05-06\ndraft = true\ntags = \"a, b,,c\"\n+++\nBody";
        let (fm, body) = parse_front_matter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.date.as_deref(), Some("2024-05-06"));
        assert!(fm.draft);
        assert_eq!(fm.tags, vec!["a", "b", "c"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_front_matter() {
        let (fm, body) = parse_front_matter("Just text\n---\nmore").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Just text\n---\nmore");
    }

    #[test]
    fn test_empty_front_matter() {
        let (fm, body) = parse_front_matter("---\n---\nBody").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unclosed_front_matter_is_error() {
        let err = parse_front_matter("---\ntitle: Hello\n\nBody").unwrap_err();
        assert!(err.contains("never closed"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(parse_front_matter("---\ntitle: [unclosed\n---\n").is_err());
        assert!(parse_front_matter("---\n- just\n- a list\n---\n").is_err());
    }

    #[test]
    fn test_lenient_fields() {
        let (fm, _) =
            parse_front_matter("---\ndraft: \"yes\"\ntitle: 2024\nslug: null\ntags: ~\n---\n").unwrap();
        assert!(fm.draft);
        assert_eq!(fm.title.as_deref(), Some("2024"));
        assert!(fm.slug.is_none());
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_get_reads_standard_and_custom_fields() {
        let (fm, _) = parse_front_matter("---\ntitle: Hi\nweight: 3\n---\n").unwrap();
        assert_eq!(fm.get("title"), Some(serde_json::json!("Hi")));
        assert_eq!(fm.get("weight"), Some(serde_json::json!(3)));
        assert_eq!(fm.get("missing"), None);
    }

    #[test]
    fn test_crlf_delimiters() {
        let (fm, body) = parse_front_matter("---\r\ntitle: Hi\r\n---\r\nBody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hi"));
        assert_eq!(body, "Body");
    }
}
