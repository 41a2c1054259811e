//! Raw option source providers.
//!
//! A provider turns some underlying format into a flat string-to-string map.
//! Structured formats are flattened one level only: nested tables and maps
//! are rejected, scalar lists are joined with `,` so that they convert
//! naturally into string sets.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::SourceError;

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;

/// A provider of flat string options.
///
/// Implement this trait to feed options from other places (environment
/// snapshots, remote stores, compiled-in bundles) into the aggregator.
pub trait OptionSource: Send + Sync {
    /// Human-readable name used for provenance and logging.
    fn name(&self) -> String;

    /// Produces the flat option map.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the underlying data cannot be read or is
    /// not a flat key/value structure.
    fn load(&self) -> Result<HashMap<String, String>, SourceError>;
}

/// An in-memory option map, e.g. a bundle compiled into the binary.
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    options: HashMap<String, String>,
}

impl MapSource {
    pub fn new(name: impl Into<String>, options: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

impl OptionSource for MapSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> Result<HashMap<String, String>, SourceError> {
        Ok(self.options.clone())
    }
}

#[derive(Debug, Clone)]
enum PropertiesInput {
    File(PathBuf),
    Inline { name: String, content: String },
}

/// Options read from `key=value` properties text.
///
/// Follows the Java `.properties` line format: `#` and `!` comment lines,
/// blank lines, and keys separated from values by `=`, `:` or whitespace.
/// A line ending in an unescaped `\` continues on the next line. The
/// escapes `\t`, `\n`, `\r`, `\f` and `\uXXXX` are decoded and any other
/// escaped character stands for itself, so `\=` and `\ ` may appear in
/// keys. A key without a value maps to the empty string.
#[derive(Debug, Clone)]
pub struct PropertiesSource {
    input: PropertiesInput,
}

impl PropertiesSource {
    /// Reads properties from a file when loaded.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: PropertiesInput::File(path.into()),
        }
    }

    /// Uses already-available properties text.
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            input: PropertiesInput::Inline {
                name: name.into(),
                content: content.into(),
            },
        }
    }
}

impl OptionSource for PropertiesSource {
    fn name(&self) -> String {
        match &self.input {
            PropertiesInput::File(path) => path.display().to_string(),
            PropertiesInput::Inline { name, .. } => name.clone(),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, SourceError> {
        let options = match &self.input {
            PropertiesInput::File(path) => parse_properties(&read_source(path)?),
            PropertiesInput::Inline { content, .. } => parse_properties(content),
        };
        debug!(source = %self.name(), keys = options.len(), "Loaded properties");
        Ok(options)
    }
}

fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let line = line.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        options.insert(unescape(key), unescape(value));
    }
    options
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped separator.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);
    (&line[..key_end], rest.trim_start_matches(is_blank))
}

// A malformed `\u` escape keeps the `u` and the text after it.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = if hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    None => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Options taken from one named top-level section of a YAML document.
///
/// ```yaml
/// production:
///   db.host: db.internal
///   db.port: 5432
///   tags: [blue, green]
/// ```
///
/// Selecting `production` yields `db.host`, `db.port` and `tags` (as
/// `"blue,green"`). `null` entries are skipped.
#[derive(Debug, Clone)]
pub struct YamlSectionSource {
    path: PathBuf,
    selector: String,
}

impl YamlSectionSource {
    pub fn new(path: impl Into<PathBuf>, selector: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            selector: selector.into(),
        }
    }
}

impl OptionSource for YamlSectionSource {
    fn name(&self) -> String {
        format!("{}#{}", self.path.display(), self.selector)
    }

    fn load(&self) -> Result<HashMap<String, String>, SourceError> {
        require_extension(&self.path, &["yaml", "yml"])?;

        let content = read_source(&self.path)?;
        let document: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| parse_error(&self.path, e))?;

        let section = document
            .get(self.selector.as_str())
            .filter(|v| !v.is_null())
            .ok_or_else(|| SourceError::MissingSelector {
                selector: self.selector.clone(),
                path: self.path.clone(),
            })?;
        let mapping = section.as_mapping().ok_or_else(|| {
            parse_error(
                &self.path,
                "expected a map of key/value pairs under the selector",
            )
        })?;

        let mut options = HashMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = yaml_scalar(key)
                .ok_or_else(|| parse_error(&self.path, "option keys must be scalars"))?;
            if value.is_null() {
                continue;
            }
            let flattened = match value {
                serde_yaml::Value::Sequence(items) => items
                    .iter()
                    .map(yaml_scalar)
                    .collect::<Option<Vec<_>>>()
                    .map(|items| items.join(",")),
                other => yaml_scalar(other),
            };
            let value = flattened.ok_or_else(|| SourceError::NestedValue {
                key: key.clone(),
                path: self.path.clone(),
            })?;
            options.insert(key, value);
        }

        debug!(source = %self.name(), keys = options.len(), "Loaded YAML section");
        Ok(options)
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_scalar(&tagged.value),
        _ => None,
    }
}

/// Options taken from one named top-level table of a TOML document.
///
/// ```toml
/// [production]
/// "db.host" = "db.internal"
/// "db.port" = 5432
/// tags = ["blue", "green"]
/// ```
#[derive(Debug, Clone)]
pub struct TomlSectionSource {
    path: PathBuf,
    selector: String,
}

impl TomlSectionSource {
    pub fn new(path: impl Into<PathBuf>, selector: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            selector: selector.into(),
        }
    }
}

impl OptionSource for TomlSectionSource {
    fn name(&self) -> String {
        format!("{}#{}", self.path.display(), self.selector)
    }

    fn load(&self) -> Result<HashMap<String, String>, SourceError> {
        require_extension(&self.path, &["toml"])?;

        let content = read_source(&self.path)?;
        let document: toml::Table =
            toml::from_str(&content).map_err(|e| parse_error(&self.path, e))?;

        let section = document
            .get(&self.selector)
            .ok_or_else(|| SourceError::MissingSelector {
                selector: self.selector.clone(),
                path: self.path.clone(),
            })?;
        let table = section.as_table().ok_or_else(|| {
            parse_error(&self.path, "expected a table of key/value pairs under the selector")
        })?;

        let mut options = HashMap::with_capacity(table.len());
        for (key, value) in table {
            let flattened = match value {
                toml::Value::Array(items) => items
                    .iter()
                    .map(toml_scalar)
                    .collect::<Option<Vec<_>>>()
                    .map(|items| items.join(",")),
                other => toml_scalar(other),
            };
            let value = flattened.ok_or_else(|| SourceError::NestedValue {
                key: key.clone(),
                path: self.path.clone(),
            })?;
            options.insert(key.clone(), value);
        }

        debug!(source = %self.name(), keys = options.len(), "Loaded TOML section");
        Ok(options)
    }
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

fn require_extension(path: &Path, allowed: &[&str]) -> Result<(), SourceError> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
        .unwrap_or(false);
    if matches {
        Ok(())
    } else {
        Err(SourceError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, reason: impl std::fmt::Display) -> SourceError {
    SourceError::Parse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
