use super::*;
use std::fs;
use tempfile::TempDir;

const CONTRACTS: &str = r#"
[[contracts]]
name = "DatabaseOptions"
namespace = "db"
shape = "template"

[[contracts.accessors]]
name = "host"

[[contracts.accessors]]
name = "timeout"
type = "integer"
default = "30"

[[contracts]]
name = "Mail"
namespace = "mail"

[[contracts.accessors]]
name = "relay"
"#;

fn write_contracts(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("contracts.toml");
    fs::write(&path, CONTRACTS).expect("Failed to write contract file");
    path
}

fn check(contracts: PathBuf, flags: &[&str]) -> (bool, String) {
    let args = CheckArgs {
        contracts,
        sources: SourceArgs {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        },
    };
    let mut out = Vec::new();
    let healthy = execute(&args, &mut out).unwrap();
    (healthy, String::from_utf8(out).unwrap())
}

#[test]
fn test_check_reports_values_and_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let contracts = write_contracts(&temp_dir);

    let (healthy, output) = check(contracts, &["--db.host=localhost", "--mail.relay=smtp"]);

    assert!(healthy);
    assert!(output.contains("[ok] DatabaseOptions"));
    assert!(output.contains("  host = localhost\n"));
    assert!(output.contains("  timeout = 30 (default)\n"));
    assert!(output.contains("[ok] Mail"));
    assert!(!output.contains("error:"));
}

#[test]
fn test_check_reports_missing_options() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let contracts = write_contracts(&temp_dir);

    let (healthy, output) = check(contracts, &["--db.host=localhost"]);

    assert!(!healthy);
    assert!(output.contains("[ok] DatabaseOptions"));
    assert!(output.contains("[failed] Mail"));
    assert!(output.contains("error: Option 'mail.relay' specified in contract [Mail]"));
}

#[test]
fn test_check_reports_malformed_values() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let contracts = write_contracts(&temp_dir);

    let (healthy, output) = check(
        contracts,
        &["--db.host=localhost", "--db.timeout=later", "--mail.relay=smtp"],
    );

    assert!(!healthy);
    assert!(output.contains("  timeout = <Cannot convert 'later' to integer"));
}

#[test]
fn test_check_rejects_invalid_contract() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("contracts.toml");
    fs::write(&path, "[[contracts]]\nname = \"Concrete\"\nnamespace = \"c\"\nshape = \"concrete\"\n")
        .unwrap();
    let args = CheckArgs {
        contracts: path,
        sources: SourceArgs::default(),
    };

    let result = execute(&args, &mut Vec::new());

    assert!(matches!(result, Err(Error::Contract(_))));
}
