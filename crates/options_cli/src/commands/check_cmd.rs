use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use options_core::{OptionsModule, OptionsRegistry};
use tracing::{info, instrument};

use crate::commands::source_args::SourceArgs;
use crate::config::ContractsFile;
use crate::errors::Error;

#[cfg(test)]
#[path = "check_cmd_tests.rs"]
mod tests;

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// TOML file declaring the contracts to materialize
    #[arg(long, value_name = "FILE")]
    pub contracts: PathBuf,

    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Resolves and materializes every declared contract, printing each
/// accessor's value.
///
/// Returns `Ok(false)` if any contract failed or any accessor value could
/// not be converted.
#[instrument(skip(out))]
pub fn execute(args: &CheckArgs, out: &mut dyn Write) -> Result<bool, Error> {
    let file = ContractsFile::load(&args.contracts)?;
    let mut module = OptionsModule::from_merged(args.sources.merge()?);
    for descriptor in file.descriptors()? {
        module.options(descriptor)?;
    }

    let mut registry = OptionsRegistry::new();
    let summary = module.configure(&mut registry);
    let mut healthy = summary.is_success();

    for name in &summary.bound {
        let Some(instance) = registry.get(name) else {
            continue;
        };
        writeln!(out, "[ok] {name}")?;
        for accessor in instance.accessors() {
            let marker = if instance.is_overridden(accessor) {
                ""
            } else {
                " (default)"
            };
            match instance.invoke(accessor) {
                Ok(value) => writeln!(out, "  {accessor} = {value}{marker}")?,
                Err(e) => {
                    healthy = false;
                    writeln!(out, "  {accessor} = <{e}>")?;
                }
            }
        }
    }
    for name in &summary.failed {
        writeln!(out, "[failed] {name}")?;
    }
    for error in registry.errors() {
        writeln!(out, "error: {error}")?;
    }

    info!(
        message = "Checked option contracts",
        bound = summary.bound.len(),
        failed = summary.failed.len()
    );
    Ok(healthy)
}
