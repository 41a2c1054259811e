//! Tests for option contract descriptors.

use super::*;

fn database_contract() -> ContractDescriptor {
    ContractDescriptor::template("DatabaseOptions")
        .namespace("db")
        .accessor("host", OptionType::String)
        .defaulted("timeout", || 30_i32)
}

#[test]
fn test_key_for_uses_namespace() {
    let contract = database_contract();

    assert_eq!(contract.key_for("timeout"), "db.timeout");
}

#[test]
fn test_key_for_empty_namespace_is_bare_accessor() {
    let contract = ContractDescriptor::interface("Root")
        .namespace("")
        .accessor("timeout", OptionType::Integer);

    assert_eq!(contract.key_for("timeout"), "timeout");
}

#[test]
fn test_accessor_lookup_and_required_flag() {
    let contract = database_contract();

    let host = contract.find_accessor("host").unwrap();
    let timeout = contract.find_accessor("timeout").unwrap();

    assert!(host.is_required());
    assert_eq!(host.return_type(), OptionType::String);
    assert!(!timeout.is_required());
    assert_eq!(timeout.return_type(), OptionType::Integer);
    assert!(contract.find_accessor("missing").is_none());
}

#[test]
fn test_defaulted_body_produces_typed_value() {
    let contract = database_contract();

    let body = contract.find_accessor("timeout").unwrap().default_body().unwrap();

    assert_eq!(body(), OptionValue::Integer(30));
}

#[test]
fn test_accessors_keep_declaration_order() {
    let contract = database_contract();

    let names: Vec<&str> = contract.accessors().iter().map(|a| a.name()).collect();

    assert_eq!(names, vec!["host", "timeout"]);
}

#[test]
fn test_validate_accepts_interface_and_template() {
    assert!(database_contract().validate().is_ok());
    assert!(ContractDescriptor::interface("Plain")
        .namespace("plain")
        .accessor("a", OptionType::Boolean)
        .validate()
        .is_ok());
}

#[test]
fn test_validate_rejects_concrete_shape() {
    let contract = ContractDescriptor::with_shape("Concrete", ContractShape::Concrete).namespace("c");

    match contract.validate() {
        Err(OptionsError::InvalidContract { contract, reason }) => {
            assert_eq!(contract, "Concrete");
            assert!(reason.contains("interface or template"));
        }
        other => panic!("Expected InvalidContract, got {other:?}"),
    }
}

#[test]
fn test_validate_rejects_missing_namespace_marker() {
    let contract = ContractDescriptor::interface("Unmarked").accessor("a", OptionType::String);

    assert!(matches!(
        contract.validate(),
        Err(OptionsError::InvalidContract { .. })
    ));
}

#[test]
fn test_validate_rejects_interface_default_bodies() {
    let contract = ContractDescriptor::interface("Defaults")
        .namespace("d")
        .defaulted("flag", || true);

    assert!(matches!(
        contract.validate(),
        Err(OptionsError::InvalidContract { .. })
    ));
}

#[test]
fn test_validate_rejects_duplicate_accessors() {
    let contract = ContractDescriptor::interface("Dupes")
        .namespace("d")
        .accessor("a", OptionType::String)
        .accessor("a", OptionType::Integer);

    match contract.validate() {
        Err(OptionsError::InvalidContract { reason, .. }) => assert!(reason.contains("'a'")),
        other => panic!("Expected InvalidContract, got {other:?}"),
    }
}

#[test]
fn test_validate_rejects_empty_accessor_name() {
    let contract = ContractDescriptor::interface("Empty")
        .namespace("e")
        .accessor(" ", OptionType::String);

    assert!(contract.validate().is_err());
}

#[test]
fn test_accessor_debug_hides_body() {
    let contract = database_contract();

    let debug = format!("{:?}", contract.find_accessor("timeout").unwrap());

    assert!(debug.contains("has_default: true"));
}
