//! Tests for option type coercion.

use super::*;

fn set_of(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// String sets
// ============================================================================

#[test]
fn test_string_set_is_split_trimmed_and_deduplicated() {
    let converter = OptionTypeConverter::new();

    let value = converter
        .convert("a,b, c, a", OptionType::StringSet)
        .unwrap();

    assert_eq!(value, OptionValue::StringSet(set_of(&["a", "b", "c"])));
}

#[test]
fn test_string_set_single_element() {
    let converter = OptionTypeConverter::new();

    let value = converter.convert("solo", OptionType::StringSet).unwrap();

    assert_eq!(value, OptionValue::StringSet(set_of(&["solo"])));
}

#[test]
fn test_string_set_keeps_empty_segments_as_empty_string() {
    let converter = OptionTypeConverter::new();

    let value = converter.convert("a,,b", OptionType::StringSet).unwrap();

    assert_eq!(value, OptionValue::StringSet(set_of(&["a", "", "b"])));
}

// ============================================================================
// Booleans
// ============================================================================

#[test]
fn test_boolean_true_ignores_case() {
    let converter = OptionTypeConverter::new();

    for raw in ["true", "TRUE", "True", "tRuE"] {
        assert_eq!(
            converter.convert(raw, OptionType::Boolean).unwrap(),
            OptionValue::Boolean(true),
            "{raw} should be true"
        );
    }
}

#[test]
fn test_boolean_false() {
    let converter = OptionTypeConverter::new();

    assert_eq!(
        converter.convert("false", OptionType::Boolean).unwrap(),
        OptionValue::Boolean(false)
    );
}

/// Booleans are parsed leniently: any token other than "true" is false,
/// never an error.
#[test]
fn test_boolean_lenient_parse_treats_unknown_tokens_as_false() {
    let converter = OptionTypeConverter::new();

    for raw in ["yes", "1", "on", "", "truthy", " true"] {
        assert_eq!(
            converter.convert(raw, OptionType::Boolean).unwrap(),
            OptionValue::Boolean(false),
            "{raw:?} should be false"
        );
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integer_parses() {
    let converter = OptionTypeConverter::new();

    assert_eq!(
        converter.convert("7", OptionType::Integer).unwrap(),
        OptionValue::Integer(7)
    );
    assert_eq!(
        converter.convert("-12", OptionType::Integer).unwrap(),
        OptionValue::Integer(-12)
    );
}

#[test]
fn test_integer_malformed_fails() {
    let converter = OptionTypeConverter::new();

    let result = converter.convert("abc", OptionType::Integer);

    match result {
        Err(OptionsError::TypeCoercion { value, target, .. }) => {
            assert_eq!(value, "abc");
            assert_eq!(target, "integer");
        }
        other => panic!("Expected TypeCoercion, got {other:?}"),
    }
}

#[test]
fn test_integer_overflow_fails() {
    let converter = OptionTypeConverter::new();

    assert!(converter
        .convert("4294967296", OptionType::Integer)
        .is_err());
}

#[test]
fn test_long_accepts_values_beyond_integer_range() {
    let converter = OptionTypeConverter::new();

    assert_eq!(
        converter.convert("4294967296", OptionType::Long).unwrap(),
        OptionValue::Long(4_294_967_296)
    );
    assert!(converter.convert("12x", OptionType::Long).is_err());
}

#[test]
fn test_double_parses() {
    let converter = OptionTypeConverter::new();

    assert_eq!(
        converter.convert("2.5", OptionType::Double).unwrap(),
        OptionValue::Double(2.5)
    );
    assert!(converter.convert("two", OptionType::Double).is_err());
}

// ============================================================================
// Passthrough and helpers
// ============================================================================

#[test]
fn test_string_passthrough_is_unchanged() {
    let converter = OptionTypeConverter::new();

    assert_eq!(
        converter.convert("  spaced , value ", OptionType::String).unwrap(),
        OptionValue::String("  spaced , value ".to_string())
    );
}

#[test]
fn test_option_type_from_name() {
    assert_eq!(OptionType::from_name("integer"), OptionType::Integer);
    assert_eq!(OptionType::from_name("Boolean"), OptionType::Boolean);
    assert_eq!(OptionType::from_name("string_set"), OptionType::StringSet);
    assert_eq!(OptionType::from_name("long"), OptionType::Long);
    assert_eq!(OptionType::from_name("double"), OptionType::Double);
    assert_eq!(OptionType::from_name("uuid"), OptionType::String);
}

#[test]
fn test_option_type_display_round_trips_through_from_name() {
    for ty in [
        OptionType::String,
        OptionType::Boolean,
        OptionType::Integer,
        OptionType::Long,
        OptionType::Double,
        OptionType::StringSet,
    ] {
        assert_eq!(OptionType::from_name(&ty.to_string()), ty);
    }
}

#[test]
fn test_string_set_display_is_sorted() {
    let value = OptionValue::StringSet(set_of(&["b", "c", "a"]));

    assert_eq!(value.to_string(), "a,b,c");
}

#[test]
fn test_from_option_value_matching_type() {
    assert_eq!(i32::from_option_value(OptionValue::Integer(3)), Ok(3));
    assert_eq!(
        String::from_option_value(OptionValue::String("x".to_string())),
        Ok("x".to_string())
    );
}

#[test]
fn test_from_option_value_mismatch_returns_value() {
    let result = i64::from_option_value(OptionValue::Integer(3));

    assert_eq!(result, Err(OptionValue::Integer(3)));
}
