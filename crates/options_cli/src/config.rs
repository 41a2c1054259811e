//! Declarative contract files for the optionsctl CLI.
//!
//! Contracts are normally declared in code. The CLI reads them from a TOML
//! file instead so that option sources can be checked without building the
//! program that consumes them.
//!
//! # Example TOML Contract File
//!
//! ```toml
//! [[contracts]]
//! name = "DatabaseOptions"
//! namespace = "db"
//! shape = "template"
//!
//! [[contracts.accessors]]
//! name = "host"
//! type = "string"
//!
//! [[contracts.accessors]]
//! name = "timeout"
//! type = "integer"
//! default = "30"
//! ```

use std::{fs, path::Path, sync::Arc};

use options_core::{ContractDescriptor, ContractShape, OptionType, OptionTypeConverter};
use serde::Deserialize;
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// All contracts declared in one file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContractsFile {
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
}

/// One declared contract.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContractSpec {
    pub name: String,

    /// The contract namespace. Omitting it leaves the contract unmarked,
    /// which registration rejects; use `""` for un-prefixed keys.
    pub namespace: Option<String>,

    #[serde(default)]
    pub shape: ShapeSpec,

    #[serde(default)]
    pub accessors: Vec<AccessorSpec>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeSpec {
    #[default]
    Interface,
    Template,
    Concrete,
}

impl From<ShapeSpec> for ContractShape {
    fn from(shape: ShapeSpec) -> Self {
        match shape {
            ShapeSpec::Interface => ContractShape::Interface,
            ShapeSpec::Template => ContractShape::Template,
            ShapeSpec::Concrete => ContractShape::Concrete,
        }
    }
}

/// One declared accessor.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AccessorSpec {
    pub name: String,

    /// Type name; unknown names are treated as `string`.
    #[serde(rename = "type", default = "default_type")]
    pub option_type: String,

    /// Raw default. Its presence gives the accessor a default body.
    pub default: Option<String>,
}

fn default_type() -> String {
    "string".to_string()
}

impl ContractsFile {
    /// Loads a contract file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!(message = "Loading contract file", path = ?path);

        let content = fs::read_to_string(path).map_err(|source| Error::LoadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parses contract file text; `path` is only used in errors.
    pub fn parse(path: &Path, content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e: toml::de::Error| Error::ParseContracts {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Builds a descriptor for every declared contract, in file order.
    ///
    /// Defaults are converted here, once, so a malformed default is
    /// reported before any option is resolved.
    pub fn descriptors(&self) -> Result<Vec<ContractDescriptor>, Error> {
        let converter = OptionTypeConverter::new();
        self.contracts
            .iter()
            .map(|spec| spec.to_descriptor(&converter))
            .collect()
    }
}

impl ContractSpec {
    fn to_descriptor(&self, converter: &OptionTypeConverter) -> Result<ContractDescriptor, Error> {
        let mut descriptor = ContractDescriptor::with_shape(&self.name, self.shape.into());
        if let Some(namespace) = &self.namespace {
            descriptor = descriptor.namespace(namespace);
        }

        for accessor in &self.accessors {
            let option_type = OptionType::from_name(&accessor.option_type);
            descriptor = match &accessor.default {
                Some(raw) => {
                    let value = converter.convert(raw, option_type).map_err(|source| {
                        Error::InvalidDefault {
                            contract: self.name.clone(),
                            accessor: accessor.name.clone(),
                            source,
                        }
                    })?;
                    descriptor.accessor_with_default(
                        &accessor.name,
                        option_type,
                        Arc::new(move || value.clone()),
                    )
                }
                None => descriptor.accessor(&accessor.name, option_type),
            };
        }
        Ok(descriptor)
    }
}
