//! Merging of raw option sources into a single precedence-resolved map.
//!
//! The merge follows a fixed precedence order from lowest to highest:
//! 1. **Command line** - `--key=value` and bare `--key` flags
//! 2. **Free sources** - flat string maps, applied in the order given
//!
//! A key defined by several layers takes the value of the last layer that
//! defines it. [`MergedOptions`] also records which layer supplied each key
//! so that precedence decisions can be explained after the fact.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::errors::SourceError;
use crate::sources::OptionSource;

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;

/// Prefix marking a command-line token as an option.
pub const LONG_FLAG_PREFIX: &str = "--";

/// The layer that supplied a merged option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionOrigin {
    /// Parsed from the command line.
    CommandLine,

    /// Taken from a free source, identified by its position and name.
    Source { index: usize, name: String },
}

impl fmt::Display for OptionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionOrigin::CommandLine => write!(f, "command line"),
            OptionOrigin::Source { index, name } => write!(f, "source #{index} ({name})"),
        }
    }
}

/// The flat key/value map produced by merging every option layer.
///
/// The value of every key equals the value from the last layer,
/// in precedence order, that defined it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedOptions {
    values: HashMap<String, String>,
    origins: HashMap<String, OptionOrigin>,
}

impl MergedOptions {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`, recording where the value came from.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>, origin: OptionOrigin) {
        let key = key.into();
        self.origins.insert(key.clone(), origin);
        self.values.insert(key, value.into());
    }

    /// Looks up the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the layer that supplied `key`.
    pub fn origin(&self, key: &str) -> Option<&OptionOrigin> {
        self.origins.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns all keys in lexical order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Borrows the underlying key/value map.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }
}

/// Splits command-line tokens into option pairs.
///
/// Only tokens starting with [`LONG_FLAG_PREFIX`] and carrying at least one
/// more character are options. `--key=value` yields `(key, value)`, splitting
/// on the first `=` only; a bare `--key` yields `(key, "true")`. Every other
/// token, including short flags and positional arguments, is ignored.
pub fn parse_command_line<S: AsRef<str>>(args: &[S]) -> Vec<(String, String)> {
    args.iter()
        .filter_map(|arg| {
            let option = arg.as_ref().strip_prefix(LONG_FLAG_PREFIX)?;
            let (key, value) = match option.split_once('=') {
                Some((key, value)) => (key, value),
                None => (option, "true"),
            };
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Stateless option source merger.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use options_core::OptionsAggregator;
///
/// let file = HashMap::from([("a".to_string(), "1".to_string())]);
/// let merged = OptionsAggregator::new().aggregate(&["--a=2", "--b"], &[file]);
///
/// assert_eq!(merged.get("a"), Some("1"));
/// assert_eq!(merged.get("b"), Some("true"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionsAggregator {}

impl OptionsAggregator {
    /// Creates a new aggregator.
    pub fn new() -> Self {
        Self {}
    }

    /// Merges the command line and in-memory free sources.
    ///
    /// Free sources are applied after the command line, in the order given,
    /// so they override command-line flags on collision.
    pub fn aggregate<S: AsRef<str>>(
        &self,
        command_line: &[S],
        free_sources: &[HashMap<String, String>],
    ) -> MergedOptions {
        let mut merged = self.from_command_line(command_line);
        for (index, source) in free_sources.iter().enumerate() {
            self.apply_layer(&mut merged, source, index, &format!("free source {index}"));
        }

        debug!(
            keys = merged.len(),
            sources = free_sources.len(),
            "Aggregated option sources"
        );
        merged
    }

    /// Loads every provider in order and merges them over the command line.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] raised by a provider. Provider
    /// failures are fatal; nothing is merged once one occurs.
    pub fn aggregate_sources<S: AsRef<str>>(
        &self,
        command_line: &[S],
        sources: &[&dyn OptionSource],
    ) -> Result<MergedOptions, SourceError> {
        let mut merged = self.from_command_line(command_line);
        for (index, source) in sources.iter().enumerate() {
            let layer = source.load()?;
            self.apply_layer(&mut merged, &layer, index, &source.name());
        }

        debug!(
            keys = merged.len(),
            sources = sources.len(),
            "Aggregated option providers"
        );
        Ok(merged)
    }

    fn from_command_line<S: AsRef<str>>(&self, command_line: &[S]) -> MergedOptions {
        let mut merged = MergedOptions::new();
        for (key, value) in parse_command_line(command_line) {
            merged.insert(key, value, OptionOrigin::CommandLine);
        }
        merged
    }

    fn apply_layer(
        &self,
        merged: &mut MergedOptions,
        layer: &HashMap<String, String>,
        index: usize,
        name: &str,
    ) {
        for (key, value) in layer {
            merged.insert(
                key.clone(),
                value.clone(),
                OptionOrigin::Source {
                    index,
                    name: name.to_string(),
                },
            );
        }
    }
}
