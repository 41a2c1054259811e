//! End-to-end tests: file sources and command line in, typed option objects out.

use std::collections::{HashMap, HashSet};
use std::fs;

use options_core::{
    ContractDescriptor, MaterializedOptions, OptionType, OptionsContract, OptionsError,
    OptionsModule, OptionsRegistry, PropertiesSource, YamlSectionSource,
};

/// A typed view over the `mail` option namespace.
struct MailOptions(MaterializedOptions);

impl MailOptions {
    fn host(&self) -> String {
        self.0.get("host").unwrap_or_default()
    }

    fn port(&self) -> i32 {
        self.0.get("port").unwrap_or_default()
    }

    fn recipients(&self) -> HashSet<String> {
        self.0.get("recipients").unwrap_or_default()
    }

    fn tls(&self) -> bool {
        self.0.get("tls").unwrap_or_default()
    }

    fn retry_backoff(&self) -> f64 {
        self.0.get("retry_backoff").unwrap_or_default()
    }
}

impl OptionsContract for MailOptions {
    fn descriptor() -> ContractDescriptor {
        ContractDescriptor::template("MailOptions")
            .namespace("mail")
            .accessor("host", OptionType::String)
            .accessor("port", OptionType::Integer)
            .accessor("recipients", OptionType::StringSet)
            .defaulted("tls", || true)
            .defaulted("retry_backoff", || 1.5_f64)
    }

    fn from_options(options: MaterializedOptions) -> Self {
        MailOptions(options)
    }
}

#[test]
fn test_files_and_command_line_materialize_typed_contract() {
    let dir = tempfile::tempdir().unwrap();
    let properties = dir.path().join("mail.properties");
    fs::write(&properties, "mail.host=smtp.internal\nmail.port=25\n").unwrap();
    let yaml = dir.path().join("app.yaml");
    fs::write(
        &yaml,
        "production:\n  mail.port: 587\n  mail.recipients: [ops, dev, ops]\nstaging:\n  mail.port: 2525\n",
    )
    .unwrap();

    let properties = PropertiesSource::from_path(&properties);
    let yaml = YamlSectionSource::new(&yaml, "production");
    let mut module =
        OptionsModule::from_sources(&["--mail.host=ignored", "--mail.tls=false"], &[&properties, &yaml])
            .unwrap();
    module.contract::<MailOptions>().unwrap();

    let mut registry = OptionsRegistry::new();
    let summary = module.configure(&mut registry);
    assert!(summary.is_success());

    let mail = registry.instance::<MailOptions>().unwrap();
    assert_eq!(mail.host(), "smtp.internal");
    assert_eq!(mail.port(), 587);
    assert_eq!(
        mail.recipients(),
        HashSet::from(["ops".to_string(), "dev".to_string()])
    );
    assert!(!mail.tls());
    assert_eq!(mail.retry_backoff(), 1.5);
}

#[test]
fn test_one_failing_contract_in_a_batch() {
    let options = HashMap::from([
        ("queue.depth".to_string(), "64".to_string()),
        ("mail.port".to_string(), "25".to_string()),
    ]);
    let mut module = OptionsModule::from_maps(&[options]);
    module.contract::<MailOptions>().unwrap();
    module
        .options(
            ContractDescriptor::interface("QueueOptions")
                .namespace("queue")
                .accessor("depth", OptionType::Integer),
        )
        .unwrap();

    let mut registry = OptionsRegistry::new();
    let summary = module.configure(&mut registry);

    assert!(registry.instance::<MailOptions>().is_none());
    assert_eq!(
        registry.get("QueueOptions").unwrap().get::<i32>("depth").unwrap(),
        64
    );
    assert_eq!(summary.failed, vec!["MailOptions"]);
    assert_eq!(
        registry.errors(),
        &[
            OptionsError::MissingOption {
                key: "mail.host".to_string(),
                contract: "MailOptions".to_string(),
            },
            OptionsError::MissingOption {
                key: "mail.recipients".to_string(),
                contract: "MailOptions".to_string(),
            },
        ]
    );
}

#[test]
fn test_malformed_number_surfaces_at_call_time() {
    let mut module = OptionsModule::from_command_line(&["--workers=many"]);
    module
        .options(
            ContractDescriptor::interface("Pool")
                .namespace("")
                .accessor("workers", OptionType::Integer),
        )
        .unwrap();

    let mut registry = OptionsRegistry::new();
    let summary = module.configure(&mut registry);

    assert!(summary.is_success());
    let pool = registry.get("Pool").unwrap();
    assert!(matches!(
        pool.get::<i32>("workers"),
        Err(OptionsError::TypeCoercion { .. })
    ));
}
