//! The options module: sources in, bound option instances out.
//!
//! An [`OptionsModule`] merges its sources once, at construction. Contracts
//! are then registered and finally [`OptionsModule::configure`] resolves,
//! materializes and binds every contract in one pass before reporting all
//! accumulated errors together.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::aggregator::{MergedOptions, OptionsAggregator};
use crate::binder::OptionsBinder;
use crate::contract::{ContractDescriptor, OptionsContract};
use crate::converter::OptionTypeConverter;
use crate::errors::{OptionsError, OptionsResult, SourceError};
use crate::materializer::materialize;
use crate::resolver::{ContractOutcome, ContractRegistry};
use crate::sources::OptionSource;

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;

/// Summary of one [`OptionsModule::configure`] pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureSummary {
    /// Contracts that were materialized and bound, in registration order.
    pub bound: Vec<String>,

    /// Contracts that were skipped because of errors, in registration order.
    pub failed: Vec<String>,

    /// Number of errors handed to the binder.
    pub error_count: usize,
}

impl ConfigureSummary {
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }
}

/// Materializes option contracts from merged option sources.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use options_core::{ContractDescriptor, OptionType, OptionsModule, OptionsRegistry};
///
/// let file = HashMap::from([("db.host".to_string(), "db.internal".to_string())]);
/// let mut module = OptionsModule::new(&["--db.timeout=5"], &[file]);
/// module.options(
///     ContractDescriptor::template("DatabaseOptions")
///         .namespace("db")
///         .accessor("host", OptionType::String)
///         .accessor("timeout", OptionType::Integer)
///         .defaulted("pooled", || true),
/// )?;
///
/// let mut registry = OptionsRegistry::new();
/// let summary = module.configure(&mut registry);
/// assert!(summary.is_success());
///
/// let db = registry.get("DatabaseOptions").unwrap();
/// assert_eq!(db.get::<String>("host")?, "db.internal");
/// assert_eq!(db.get::<i32>("timeout")?, 5);
/// assert!(db.get::<bool>("pooled")?);
/// # Ok::<(), options_core::OptionsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OptionsModule {
    options: MergedOptions,
    registry: ContractRegistry,
    converter: OptionTypeConverter,
}

impl OptionsModule {
    /// Merges `command_line` with in-memory `free_sources`.
    ///
    /// Free sources override command-line flags; later free sources override
    /// earlier ones.
    pub fn new<S: AsRef<str>>(command_line: &[S], free_sources: &[HashMap<String, String>]) -> Self {
        Self::from_merged(OptionsAggregator::new().aggregate(command_line, free_sources))
    }

    /// Uses the command line as the only source.
    pub fn from_command_line<S: AsRef<str>>(command_line: &[S]) -> Self {
        Self::new(command_line, &[])
    }

    /// Uses in-memory free sources only.
    pub fn from_maps(free_sources: &[HashMap<String, String>]) -> Self {
        Self::new::<&str>(&[], free_sources)
    }

    /// Loads providers in order over the command line.
    ///
    /// # Errors
    ///
    /// Returns the first provider failure; these are fatal.
    pub fn from_sources<S: AsRef<str>>(
        command_line: &[S],
        sources: &[&dyn OptionSource],
    ) -> Result<Self, SourceError> {
        let merged = OptionsAggregator::new().aggregate_sources(command_line, sources)?;
        Ok(Self::from_merged(merged))
    }

    /// Wraps an already merged option map.
    pub fn from_merged(options: MergedOptions) -> Self {
        Self {
            options,
            registry: ContractRegistry::new(),
            converter: OptionTypeConverter::new(),
        }
    }

    /// Enables or disables base-class dispatch for template contracts.
    pub fn with_template_dispatch(mut self, available: bool) -> Self {
        self.registry.set_template_dispatch(available);
        self
    }

    /// Registers a contract for materialization.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidContract`] if the descriptor is not an
    /// eligible option contract.
    pub fn options(&mut self, descriptor: ContractDescriptor) -> OptionsResult<&mut Self> {
        self.registry.register(descriptor)?;
        Ok(self)
    }

    /// Registers the contract of a typed options type.
    pub fn contract<T: OptionsContract>(&mut self) -> OptionsResult<&mut Self> {
        self.options(T::descriptor())
    }

    pub fn merged_options(&self) -> &MergedOptions {
        &self.options
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Resolves every registered contract without binding anything.
    pub fn resolve(&self) -> Vec<ContractOutcome> {
        self.registry.resolve_all(&self.options)
    }

    /// Resolves, materializes and binds every registered contract.
    ///
    /// Failing contracts are skipped without affecting the others. Once all
    /// contracts are processed, every accumulated error is handed to the
    /// binder in registration order.
    pub fn configure<B: OptionsBinder + ?Sized>(&self, binder: &mut B) -> ConfigureSummary {
        let mut summary = ConfigureSummary::default();
        let mut errors: Vec<OptionsError> = Vec::new();

        for outcome in self.resolve() {
            let descriptor = outcome.descriptor().clone();
            match materialize(&outcome, self.converter) {
                Some(instance) => {
                    info!(contract = %descriptor.name(), "Bound option contract");
                    binder.bind_instance(&descriptor, instance);
                    summary.bound.push(descriptor.name().to_string());
                }
                None => {
                    warn!(
                        contract = %descriptor.name(),
                        errors = outcome.errors().len(),
                        "Skipping option contract"
                    );
                    summary.failed.push(descriptor.name().to_string());
                    errors.extend(outcome.errors().iter().cloned());
                }
            }
        }

        summary.error_count = errors.len();
        for error in errors {
            binder.report_error(error);
        }
        summary
    }
}
