use std::path::PathBuf;

use clap::Args;
use options_core::{
    MergedOptions, OptionSource, OptionsAggregator, PropertiesSource, TomlSectionSource,
    YamlSectionSource,
};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "source_args_tests.rs"]
mod tests;

/// Option sources, in increasing precedence: flags after `--`, then
/// properties files in the order given, then the YAML section, then the
/// TOML section.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Properties file to load (repeatable)
    #[arg(long = "properties", value_name = "FILE")]
    pub properties: Vec<PathBuf>,

    /// YAML file to take the `--section` table from
    #[arg(long, value_name = "FILE")]
    pub yaml: Option<PathBuf>,

    /// TOML file to take the `--section` table from
    #[arg(long, value_name = "FILE")]
    pub toml: Option<PathBuf>,

    /// Top-level section selected from the YAML or TOML file
    #[arg(long, value_name = "NAME")]
    pub section: Option<String>,

    /// Option flags, e.g. `-- --db.timeout=5 --verbose`
    #[arg(last = true, value_name = "FLAGS")]
    pub flags: Vec<String>,
}

impl SourceArgs {
    /// Builds the configured source providers in precedence order.
    pub fn sources(&self) -> Result<Vec<Box<dyn OptionSource>>, Error> {
        let mut sources: Vec<Box<dyn OptionSource>> = self
            .properties
            .iter()
            .map(|path| Box::new(PropertiesSource::from_path(path)) as Box<dyn OptionSource>)
            .collect();

        if (self.yaml.is_some() || self.toml.is_some()) && self.section.is_none() {
            return Err(Error::InvalidArguments(
                "--yaml and --toml require --section".to_string(),
            ));
        }
        if self.section.is_some() && self.yaml.is_none() && self.toml.is_none() {
            return Err(Error::InvalidArguments(
                "--section requires --yaml or --toml".to_string(),
            ));
        }

        if let Some(section) = &self.section {
            if let Some(yaml) = &self.yaml {
                sources.push(Box::new(YamlSectionSource::new(yaml, section)));
            }
            if let Some(toml) = &self.toml {
                sources.push(Box::new(TomlSectionSource::new(toml, section)));
            }
        }
        Ok(sources)
    }

    /// Loads every source and merges them over the flags.
    pub fn merge(&self) -> Result<MergedOptions, Error> {
        let sources = self.sources()?;
        let refs: Vec<&dyn OptionSource> = sources.iter().map(|s| s.as_ref()).collect();
        debug!(message = "Merging option sources", sources = refs.len(), flags = self.flags.len());

        Ok(OptionsAggregator::new().aggregate_sources(&self.flags, &refs)?)
    }
}
