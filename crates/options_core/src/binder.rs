//! Registration capability for materialized option instances.

use std::collections::HashMap;

use crate::contract::{ContractDescriptor, OptionsContract};
use crate::errors::OptionsError;
use crate::materializer::MaterializedOptions;

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;

/// The host capability that owns materialized instances and configuration
/// errors.
///
/// [`crate::OptionsModule::configure`] calls `bind_instance` once per
/// materialized contract and then `report_error` once per accumulated error.
/// Implementations decide whether errors stop the host.
pub trait OptionsBinder {
    /// Binds `instance` against its contract.
    fn bind_instance(&mut self, contract: &ContractDescriptor, instance: MaterializedOptions);

    /// Records a configuration error without stopping configuration.
    fn report_error(&mut self, error: OptionsError);
}

/// An in-memory [`OptionsBinder`] keyed by contract name.
///
/// # Examples
///
/// ```rust
/// use options_core::{ContractDescriptor, OptionType, OptionsModule, OptionsRegistry};
///
/// let mut module = OptionsModule::from_command_line(&["--port=8080"]);
/// module.options(
///     ContractDescriptor::interface("Server")
///         .namespace("")
///         .accessor("port", OptionType::Integer),
/// )?;
///
/// let mut registry = OptionsRegistry::new();
/// module.configure(&mut registry);
///
/// assert_eq!(registry.get("Server").unwrap().get::<i32>("port")?, 8080);
/// # Ok::<(), options_core::OptionsError>(())
/// ```
#[derive(Debug, Default)]
pub struct OptionsRegistry {
    instances: HashMap<String, MaterializedOptions>,
    errors: Vec<OptionsError>,
}

impl OptionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The instance bound for the contract called `contract`.
    pub fn get(&self, contract: &str) -> Option<&MaterializedOptions> {
        self.instances.get(contract)
    }

    /// The bound instance wrapped in its typed contract.
    pub fn instance<T: OptionsContract>(&self) -> Option<T> {
        let descriptor = T::descriptor();
        self.instances
            .get(descriptor.name())
            .cloned()
            .map(T::from_options)
    }

    /// Names of all bound contracts, in lexical order.
    pub fn contracts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.instances.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Reported errors, in report order.
    pub fn errors(&self) -> &[OptionsError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl OptionsBinder for OptionsRegistry {
    fn bind_instance(&mut self, contract: &ContractDescriptor, instance: MaterializedOptions) {
        self.instances.insert(contract.name().to_string(), instance);
    }

    fn report_error(&mut self, error: OptionsError) {
        self.errors.push(error);
    }
}
