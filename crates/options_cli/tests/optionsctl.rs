//! Runs the optionsctl commands against file-backed sources.

use std::fs;

use options_cli::commands::{check_cmd, check_cmd::CheckArgs, dump_cmd, source_args::SourceArgs};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

#[test]
fn test_layered_sources_feed_contract_check() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let properties = write(&dir, "base.properties", "cache.size=10\ncache.enabled=false\n");
    let toml = write(
        &dir,
        "app.toml",
        "[production]\n\"cache.enabled\" = true\n\"cache.regions\" = [\"eu\", \"us\"]\n",
    );
    let contracts = write(
        &dir,
        "contracts.toml",
        r#"
[[contracts]]
name = "CacheOptions"
namespace = "cache"
shape = "template"

[[contracts.accessors]]
name = "size"
type = "integer"

[[contracts.accessors]]
name = "enabled"
type = "boolean"

[[contracts.accessors]]
name = "regions"
type = "string_set"

[[contracts.accessors]]
name = "ttl"
type = "long"
default = "600"
"#,
    );
    let sources = SourceArgs {
        properties: vec![properties],
        toml: Some(toml),
        section: Some("production".to_string()),
        flags: vec!["--cache.size=99".to_string()],
        ..Default::default()
    };

    let mut dumped = Vec::new();
    dump_cmd::execute(&sources, &mut dumped).unwrap();
    let dumped = String::from_utf8(dumped).unwrap();
    assert!(dumped.contains("cache.enabled = true    [source #1"));
    assert!(dumped.contains("cache.size = 10    [source #0"));

    let mut checked = Vec::new();
    let healthy = check_cmd::execute(&CheckArgs { contracts, sources }, &mut checked).unwrap();
    let checked = String::from_utf8(checked).unwrap();

    assert!(healthy, "check output:\n{checked}");
    assert!(checked.contains("  enabled = true\n"));
    assert!(checked.contains("  regions = eu,us\n"));
    assert!(checked.contains("  size = 10\n"));
    assert!(checked.contains("  ttl = 600 (default)\n"));
}
