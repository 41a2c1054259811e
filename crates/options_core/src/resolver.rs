//! Contract registration and key resolution.
//!
//! Every registered contract is resolved on its own against the merged
//! option map: one contract failing never affects another. Each missing
//! required accessor yields one [`OptionsError::MissingOption`], and all of
//! a failing contract's missing keys are collected before it is abandoned.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::aggregator::MergedOptions;
use crate::contract::{ContractDescriptor, ContractShape};
use crate::errors::{OptionsError, OptionsResult};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// How a single accessor was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// The raw option string, converted when the accessor is invoked.
    Raw(String),

    /// No option overrides the accessor; its default body applies.
    UseDefault,
}

/// A contract whose required accessors all resolved.
#[derive(Debug, Clone)]
pub struct ResolvedContract {
    descriptor: Arc<ContractDescriptor>,
    values: HashMap<String, ResolvedValue>,
}

impl ResolvedContract {
    pub fn descriptor(&self) -> &Arc<ContractDescriptor> {
        &self.descriptor
    }

    /// Resolution of the accessor named `accessor`.
    pub fn value(&self, accessor: &str) -> Option<&ResolvedValue> {
        self.values.get(accessor)
    }

    pub fn values(&self) -> &HashMap<String, ResolvedValue> {
        &self.values
    }
}

/// Per-contract resolution result.
#[derive(Debug, Clone)]
pub enum ContractOutcome {
    Resolved(ResolvedContract),

    /// The contract cannot be materialized. `errors` is never empty.
    Failed {
        descriptor: Arc<ContractDescriptor>,
        errors: Vec<OptionsError>,
    },
}

impl ContractOutcome {
    pub fn descriptor(&self) -> &Arc<ContractDescriptor> {
        match self {
            ContractOutcome::Resolved(resolved) => &resolved.descriptor,
            ContractOutcome::Failed { descriptor, .. } => descriptor,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ContractOutcome::Resolved(_))
    }

    /// Errors recorded for the contract; empty on success.
    pub fn errors(&self) -> &[OptionsError] {
        match self {
            ContractOutcome::Resolved(_) => &[],
            ContractOutcome::Failed { errors, .. } => errors,
        }
    }
}

/// Registry of option contracts awaiting resolution.
///
/// Template contracts need base-class dispatch to fall back to their default
/// bodies. When that capability is switched off they are still resolved, so
/// that their missing keys are reported, but always fail with
/// [`OptionsError::TemplateDispatchUnavailable`].
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    contracts: Vec<Arc<ContractDescriptor>>,
    template_dispatch: bool,
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractRegistry {
    /// Creates an empty registry with template dispatch available.
    pub fn new() -> Self {
        Self {
            contracts: Vec::new(),
            template_dispatch: true,
        }
    }

    /// Enables or disables base-class dispatch for template contracts.
    pub fn set_template_dispatch(&mut self, available: bool) {
        self.template_dispatch = available;
    }

    pub fn template_dispatch(&self) -> bool {
        self.template_dispatch
    }

    /// Validates and queues a contract.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidContract`] if the descriptor is not an
    /// eligible contract or a contract with the same name is already queued.
    pub fn register(&mut self, descriptor: ContractDescriptor) -> OptionsResult<()> {
        descriptor.validate()?;
        if self.contracts.iter().any(|c| c.name() == descriptor.name()) {
            return Err(OptionsError::InvalidContract {
                contract: descriptor.name().to_string(),
                reason: "is already registered".to_string(),
            });
        }

        debug!(contract = %descriptor.name(), shape = %descriptor.shape(), "Registered option contract");
        self.contracts.push(Arc::new(descriptor));
        Ok(())
    }

    pub fn contracts(&self) -> &[Arc<ContractDescriptor>] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Resolves every registered contract, in registration order.
    pub fn resolve_all(&self, options: &MergedOptions) -> Vec<ContractOutcome> {
        self.contracts
            .iter()
            .map(|descriptor| self.resolve(descriptor, options))
            .collect()
    }

    fn resolve(
        &self,
        descriptor: &Arc<ContractDescriptor>,
        options: &MergedOptions,
    ) -> ContractOutcome {
        let mut errors = Vec::new();
        if descriptor.shape() == ContractShape::Template && !self.template_dispatch {
            warn!(contract = %descriptor.name(), "Template contract registered without base-class dispatch");
            errors.push(OptionsError::TemplateDispatchUnavailable {
                contract: descriptor.name().to_string(),
            });
        }

        let mut values = HashMap::with_capacity(descriptor.accessors().len());
        for accessor in descriptor.accessors() {
            let key = descriptor.key_for(accessor.name());
            match options.get(&key) {
                Some(raw) => {
                    values.insert(accessor.name().to_string(), ResolvedValue::Raw(raw.to_string()));
                }
                None if accessor.is_required() => {
                    warn!(contract = %descriptor.name(), key = %key, "Required option is unavailable");
                    errors.push(OptionsError::MissingOption {
                        key,
                        contract: descriptor.name().to_string(),
                    });
                }
                None => {
                    values.insert(accessor.name().to_string(), ResolvedValue::UseDefault);
                }
            }
        }

        if errors.is_empty() {
            debug!(contract = %descriptor.name(), accessors = values.len(), "Resolved option contract");
            ContractOutcome::Resolved(ResolvedContract {
                descriptor: Arc::clone(descriptor),
                values,
            })
        } else {
            ContractOutcome::Failed {
                descriptor: Arc::clone(descriptor),
                errors,
            }
        }
    }
}
