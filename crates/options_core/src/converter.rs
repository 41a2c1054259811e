//! Coercion of raw option strings into declared accessor types.
//!
//! Every raw source produces plain strings. The [`OptionTypeConverter`] turns
//! such a string into an [`OptionValue`] matching the accessor's declared
//! [`OptionType`]. Conversion is a pure function of its inputs, so a single
//! converter can be shared freely between materialized instances.

use std::collections::HashSet;
use std::fmt;

use crate::errors::{OptionsError, OptionsResult};

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;

/// The declared return type of a contract accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Raw string passthrough. Also the fallback for anything unrecognised.
    String,
    Boolean,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    Double,
    /// Comma separated, trimmed, de-duplicated set of strings.
    StringSet,
}

impl OptionType {
    /// Parses a type name as written in declarative contract files.
    ///
    /// Unknown names map to [`OptionType::String`], mirroring the
    /// converter's passthrough rule for unrecognised target types.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "boolean" | "bool" => OptionType::Boolean,
            "integer" | "int" => OptionType::Integer,
            "long" => OptionType::Long,
            "double" | "float" => OptionType::Double,
            "string_set" | "set" => OptionType::StringSet,
            _ => OptionType::String,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::String => write!(f, "string"),
            OptionType::Boolean => write!(f, "boolean"),
            OptionType::Integer => write!(f, "integer"),
            OptionType::Long => write!(f, "long"),
            OptionType::Double => write!(f, "double"),
            OptionType::StringSet => write!(f, "string_set"),
        }
    }
}

/// A converted option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    StringSet(HashSet<String>),
}

impl OptionValue {
    /// Returns the [`OptionType`] this value belongs to.
    pub fn option_type(&self) -> OptionType {
        match self {
            OptionValue::String(_) => OptionType::String,
            OptionValue::Boolean(_) => OptionType::Boolean,
            OptionValue::Integer(_) => OptionType::Integer,
            OptionValue::Long(_) => OptionType::Long,
            OptionValue::Double(_) => OptionType::Double,
            OptionValue::StringSet(_) => OptionType::StringSet,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(s) => write!(f, "{s}"),
            OptionValue::Boolean(b) => write!(f, "{b}"),
            OptionValue::Integer(i) => write!(f, "{i}"),
            OptionValue::Long(l) => write!(f, "{l}"),
            OptionValue::Double(d) => write!(f, "{d}"),
            OptionValue::StringSet(set) => {
                // Sets are unordered; sort for stable output.
                let mut items: Vec<&str> = set.iter().map(String::as_str).collect();
                items.sort_unstable();
                write!(f, "{}", items.join(","))
            }
        }
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Long(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Double(value)
    }
}

impl From<HashSet<String>> for OptionValue {
    fn from(value: HashSet<String>) -> Self {
        OptionValue::StringSet(value)
    }
}

/// Stateless string-to-type converter.
///
/// Rules, in priority order:
/// 1. `StringSet`: split on `,`, trim every element, collect into a set.
/// 2. `Boolean`: `true` when the string equals `"true"` ignoring case,
///    `false` for anything else. Malformed booleans never fail.
/// 3. `Integer`, `Long`, `Double`: numeric parse, failing with
///    [`OptionsError::TypeCoercion`] on malformed input.
/// 4. `String`: returned unchanged.
///
/// # Examples
///
/// ```rust
/// use options_core::{OptionType, OptionTypeConverter, OptionValue};
///
/// let converter = OptionTypeConverter::new();
/// assert_eq!(
///     converter.convert("7", OptionType::Integer)?,
///     OptionValue::Integer(7)
/// );
/// assert_eq!(
///     converter.convert("yes", OptionType::Boolean)?,
///     OptionValue::Boolean(false)
/// );
/// # Ok::<(), options_core::OptionsError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionTypeConverter;

impl OptionTypeConverter {
    /// Creates a new converter.
    pub fn new() -> Self {
        Self
    }

    /// Converts `raw` into a value of `target` type.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::TypeCoercion`] if `raw` is not a valid
    /// number for a numeric `target`.
    pub fn convert(&self, raw: &str, target: OptionType) -> OptionsResult<OptionValue> {
        match target {
            OptionType::StringSet => Ok(OptionValue::StringSet(
                raw.split(',').map(|s| s.trim().to_string()).collect(),
            )),
            OptionType::Boolean => Ok(OptionValue::Boolean(raw.eq_ignore_ascii_case("true"))),
            OptionType::Integer => raw
                .parse::<i32>()
                .map(OptionValue::Integer)
                .map_err(|e| coercion_error(raw, target, e)),
            OptionType::Long => raw
                .parse::<i64>()
                .map(OptionValue::Long)
                .map_err(|e| coercion_error(raw, target, e)),
            OptionType::Double => raw
                .trim()
                .parse::<f64>()
                .map(OptionValue::Double)
                .map_err(|e| coercion_error(raw, target, e)),
            OptionType::String => Ok(OptionValue::String(raw.to_string())),
        }
    }
}

fn coercion_error(raw: &str, target: OptionType, reason: impl fmt::Display) -> OptionsError {
    OptionsError::TypeCoercion {
        value: raw.to_string(),
        target: target.to_string(),
        reason: reason.to_string(),
    }
}

/// Rust types that can be extracted from an [`OptionValue`].
///
/// Used by [`crate::MaterializedOptions::get`] to hand back natively typed
/// accessor results.
pub trait FromOptionValue: Sized {
    /// The option type this Rust type corresponds to.
    const OPTION_TYPE: OptionType;

    /// Extracts `Self`, returning the value unchanged if its type differs.
    fn from_option_value(value: OptionValue) -> Result<Self, OptionValue>;
}

macro_rules! impl_from_option_value {
    ($ty:ty, $variant:ident) => {
        impl FromOptionValue for $ty {
            const OPTION_TYPE: OptionType = OptionType::$variant;

            fn from_option_value(value: OptionValue) -> Result<Self, OptionValue> {
                match value {
                    OptionValue::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_from_option_value!(String, String);
impl_from_option_value!(bool, Boolean);
impl_from_option_value!(i32, Integer);
impl_from_option_value!(i64, Long);
impl_from_option_value!(f64, Double);
impl_from_option_value!(HashSet<String>, StringSet);
