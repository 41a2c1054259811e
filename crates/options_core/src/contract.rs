//! Option contract descriptors.
//!
//! A contract describes a set of named, typed accessors that together make
//! up one configuration object. Contracts come in two shapes:
//!
//! - **Interface**: every accessor must be resolved from the option sources.
//! - **Template**: accessors may carry a default body, invoked whenever no
//!   option source overrides them.
//!
//! Each accessor maps to the option key `<namespace>.<accessor>`, or just
//! `<accessor>` when the namespace is empty.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::converter::{FromOptionValue, OptionType, OptionValue};
use crate::errors::{OptionsError, OptionsResult};
use crate::materializer::MaterializedOptions;

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;

/// An accessor's built-in fallback implementation.
pub type DefaultBody = Arc<dyn Fn() -> OptionValue + Send + Sync>;

/// The abstract shape of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractShape {
    /// All accessors are abstract.
    Interface,

    /// Some accessors carry default bodies.
    Template,

    /// A fully concrete type. Never eligible as an option contract.
    Concrete,
}

impl fmt::Display for ContractShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractShape::Interface => write!(f, "interface"),
            ContractShape::Template => write!(f, "template"),
            ContractShape::Concrete => write!(f, "concrete"),
        }
    }
}

/// One accessor of a contract.
#[derive(Clone)]
pub struct AccessorDescriptor {
    name: String,
    return_type: OptionType,
    default_body: Option<DefaultBody>,
}

impl AccessorDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> OptionType {
        self.return_type
    }

    /// The default body, if the accessor has one.
    pub fn default_body(&self) -> Option<&DefaultBody> {
        self.default_body.as_ref()
    }

    /// Whether resolution must find a value for this accessor.
    pub fn is_required(&self) -> bool {
        self.default_body.is_none()
    }
}

impl fmt::Debug for AccessorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDescriptor")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("has_default", &self.default_body.is_some())
            .finish()
    }
}

/// Declaration of an option contract.
///
/// The namespace doubles as the contract marker: a descriptor without one
/// is rejected at registration. Use an empty namespace for un-prefixed keys.
///
/// # Examples
///
/// ```rust
/// use options_core::{ContractDescriptor, OptionType};
///
/// let contract = ContractDescriptor::template("DatabaseOptions")
///     .namespace("db")
///     .accessor("host", OptionType::String)
///     .defaulted("timeout", || 30_i32);
///
/// assert_eq!(contract.key_for("timeout"), "db.timeout");
/// assert!(contract.find_accessor("host").unwrap().is_required());
/// ```
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    name: String,
    namespace: Option<String>,
    shape: ContractShape,
    accessors: Vec<AccessorDescriptor>,
}

impl ContractDescriptor {
    /// Starts an all-abstract contract.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_shape(name, ContractShape::Interface)
    }

    /// Starts a contract whose accessors may have default bodies.
    pub fn template(name: impl Into<String>) -> Self {
        Self::with_shape(name, ContractShape::Template)
    }

    pub fn with_shape(name: impl Into<String>, shape: ContractShape) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            shape,
            accessors: Vec::new(),
        }
    }

    /// Marks the descriptor as an option contract under `namespace`.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds an accessor without a default body.
    pub fn accessor(mut self, name: impl Into<String>, return_type: OptionType) -> Self {
        self.accessors.push(AccessorDescriptor {
            name: name.into(),
            return_type,
            default_body: None,
        });
        self
    }

    /// Adds an accessor with an untyped default body.
    ///
    /// The body should produce a value of `return_type`; typed reads of a
    /// mismatching default fail with [`OptionsError::TypeMismatch`].
    pub fn accessor_with_default(
        mut self,
        name: impl Into<String>,
        return_type: OptionType,
        body: DefaultBody,
    ) -> Self {
        self.accessors.push(AccessorDescriptor {
            name: name.into(),
            return_type,
            default_body: Some(body),
        });
        self
    }

    /// Adds an accessor whose return type follows its default body.
    pub fn defaulted<T, F>(self, name: impl Into<String>, body: F) -> Self
    where
        T: FromOptionValue + Into<OptionValue>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.accessor_with_default(name, T::OPTION_TYPE, Arc::new(move || body().into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The contract namespace, or `None` if the contract marker is absent.
    pub fn namespace_marker(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn shape(&self) -> ContractShape {
        self.shape
    }

    pub fn accessors(&self) -> &[AccessorDescriptor] {
        &self.accessors
    }

    /// The accessor called `name`, if declared.
    pub fn find_accessor(&self, name: &str) -> Option<&AccessorDescriptor> {
        self.accessors.iter().find(|a| a.name == name)
    }

    /// Computes the option key an accessor resolves against.
    pub fn key_for(&self, accessor: &str) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}.{accessor}"),
            _ => accessor.to_string(),
        }
    }

    /// Checks that the descriptor is eligible for registration.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidContract`] if the shape is concrete,
    /// the namespace marker is missing, an interface declares default
    /// bodies, or accessor names are empty or duplicated.
    pub fn validate(&self) -> OptionsResult<()> {
        if self.shape == ContractShape::Concrete {
            return Err(self.invalid("must be an interface or template contract"));
        }
        if self.namespace.is_none() {
            return Err(self.invalid("must be marked as an option contract with a namespace"));
        }

        let mut seen = HashSet::with_capacity(self.accessors.len());
        for accessor in &self.accessors {
            if accessor.name.trim().is_empty() {
                return Err(self.invalid("accessor names must not be empty"));
            }
            if !seen.insert(accessor.name.as_str()) {
                return Err(self.invalid(&format!(
                    "declares accessor '{}' more than once",
                    accessor.name
                )));
            }
            if self.shape == ContractShape::Interface && accessor.default_body.is_some() {
                return Err(self.invalid(&format!(
                    "interface contracts cannot give accessor '{}' a default body",
                    accessor.name
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> OptionsError {
        OptionsError::InvalidContract {
            contract: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A Rust type backed by a materialized option contract.
///
/// Implementors declare their contract and wrap the materialized instance,
/// usually forwarding each method to [`MaterializedOptions::get`].
pub trait OptionsContract: Sized {
    fn descriptor() -> ContractDescriptor;

    fn from_options(options: MaterializedOptions) -> Self;
}
