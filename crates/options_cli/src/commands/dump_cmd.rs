use std::io::Write;

use tracing::instrument;

use crate::commands::source_args::SourceArgs;
use crate::errors::Error;

#[cfg(test)]
#[path = "dump_cmd_tests.rs"]
mod tests;

/// Prints every merged option with the layer that supplied it.
#[instrument(skip(out))]
pub fn execute(args: &SourceArgs, out: &mut dyn Write) -> Result<(), Error> {
    let merged = args.merge()?;

    for key in merged.keys() {
        let value = merged.get(key).unwrap_or_default();
        match merged.origin(key) {
            Some(origin) => writeln!(out, "{key} = {value}    [{origin}]")?,
            None => writeln!(out, "{key} = {value}")?,
        }
    }
    Ok(())
}
