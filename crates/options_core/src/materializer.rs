//! Materialization of resolved contracts into live option objects.
//!
//! Instead of generating proxy types at runtime, every materialized
//! instance carries an explicit dispatch table mapping each accessor to
//! either a resolved raw string (converted on every call) or a call-through
//! to the accessor's default body.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::contract::{ContractShape, DefaultBody};
use crate::converter::{FromOptionValue, OptionType, OptionTypeConverter, OptionValue};
use crate::errors::{OptionsError, OptionsResult};
use crate::resolver::{ContractOutcome, ResolvedValue};

#[cfg(test)]
#[path = "materializer_tests.rs"]
mod tests;

#[derive(Clone)]
enum Dispatch {
    Resolved { raw: String, return_type: OptionType },
    CallThrough { return_type: OptionType, body: DefaultBody },
}

impl Dispatch {
    fn return_type(&self) -> OptionType {
        match self {
            Dispatch::Resolved { return_type, .. } | Dispatch::CallThrough { return_type, .. } => {
                *return_type
            }
        }
    }
}

/// A live object satisfying an option contract.
///
/// Cloning is cheap; clones share the same immutable dispatch table, so
/// instances can be read from many threads without synchronisation.
#[derive(Clone)]
pub struct MaterializedOptions {
    contract: Arc<str>,
    shape: ContractShape,
    dispatch: Arc<HashMap<String, Dispatch>>,
    converter: OptionTypeConverter,
}

impl MaterializedOptions {
    /// Name of the contract this instance satisfies.
    pub fn contract_name(&self) -> &str {
        &self.contract
    }

    pub fn shape(&self) -> ContractShape {
        self.shape
    }

    /// Names of all accessors, in lexical order.
    pub fn accessors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dispatch.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether `accessor` answers from an option source rather than its
    /// default body.
    pub fn is_overridden(&self, accessor: &str) -> bool {
        matches!(self.dispatch.get(accessor), Some(Dispatch::Resolved { .. }))
    }

    /// Invokes an accessor.
    ///
    /// Resolved values are converted to the accessor's return type on every
    /// call; default bodies are invoked and their result returned as is.
    ///
    /// # Errors
    ///
    /// - [`OptionsError::UnknownAccessor`] if the contract has no such accessor
    /// - [`OptionsError::TypeCoercion`] if the resolved string is malformed
    pub fn invoke(&self, accessor: &str) -> OptionsResult<OptionValue> {
        match self.dispatch.get(accessor) {
            Some(Dispatch::Resolved { raw, return_type }) => {
                self.converter.convert(raw, *return_type)
            }
            Some(Dispatch::CallThrough { body, .. }) => Ok(body()),
            None => Err(OptionsError::UnknownAccessor {
                contract: self.contract.to_string(),
                accessor: accessor.to_string(),
            }),
        }
    }

    /// Invokes an accessor and extracts a natively typed result.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`MaterializedOptions::invoke`], returns
    /// [`OptionsError::TypeMismatch`] if `T` does not match the accessor's
    /// declared type or the value produced by its default body.
    pub fn get<T: FromOptionValue>(&self, accessor: &str) -> OptionsResult<T> {
        if let Some(entry) = self.dispatch.get(accessor) {
            if entry.return_type() != T::OPTION_TYPE {
                return Err(mismatch(accessor, T::OPTION_TYPE, entry.return_type()));
            }
        }

        let value = self.invoke(accessor)?;
        T::from_option_value(value).map_err(|v| mismatch(accessor, T::OPTION_TYPE, v.option_type()))
    }
}

fn mismatch(accessor: &str, expected: OptionType, actual: OptionType) -> OptionsError {
    OptionsError::TypeMismatch {
        accessor: accessor.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

impl fmt::Debug for MaterializedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializedOptions")
            .field("contract", &self.contract)
            .field("shape", &self.shape)
            .field("accessors", &self.accessors())
            .finish()
    }
}

/// Builds a live instance from a contract's resolution outcome.
///
/// Returns `None` for failed outcomes; their errors are reported by the
/// caller that owns error reporting.
pub fn materialize(
    outcome: &ContractOutcome,
    converter: OptionTypeConverter,
) -> Option<MaterializedOptions> {
    let resolved = match outcome {
        ContractOutcome::Resolved(resolved) => resolved,
        ContractOutcome::Failed { .. } => return None,
    };
    let descriptor = resolved.descriptor();

    let mut dispatch = HashMap::with_capacity(descriptor.accessors().len());
    for accessor in descriptor.accessors() {
        let return_type = accessor.return_type();
        let entry = match (resolved.value(accessor.name()), accessor.default_body()) {
            (Some(ResolvedValue::Raw(raw)), _) => Dispatch::Resolved {
                raw: raw.clone(),
                return_type,
            },
            (Some(ResolvedValue::UseDefault), Some(body)) => Dispatch::CallThrough {
                return_type,
                body: Arc::clone(body),
            },
            _ => {
                warn!(
                    contract = %descriptor.name(),
                    accessor = %accessor.name(),
                    "Accessor has neither a resolved value nor a default body"
                );
                return None;
            }
        };
        dispatch.insert(accessor.name().to_string(), entry);
    }

    Some(MaterializedOptions {
        contract: Arc::from(descriptor.name()),
        shape: descriptor.shape(),
        dispatch: Arc::new(dispatch),
        converter,
    })
}
