//! Strongly-typed option objects from loosely-typed string sources.
//!
//! Raw options come from the command line (`--key=value`, bare `--key`) and
//! from any number of flat string maps (properties text, a section of a
//! YAML or TOML file, in-memory bundles). They are merged with a fixed
//! precedence, then every registered [`ContractDescriptor`] is resolved
//! against the merged map and materialized into a [`MaterializedOptions`]
//! instance whose accessors return converted values or fall back to their
//! default bodies.
//!
//! # Example
//!
//! ```rust
//! use options_core::{
//!     ContractDescriptor, MaterializedOptions, OptionType, OptionsContract, OptionsModule,
//!     OptionsRegistry,
//! };
//!
//! struct Server(MaterializedOptions);
//!
//! impl Server {
//!     fn port(&self) -> i32 {
//!         self.0.get("port").unwrap_or(80)
//!     }
//! }
//!
//! impl OptionsContract for Server {
//!     fn descriptor() -> ContractDescriptor {
//!         ContractDescriptor::interface("Server")
//!             .namespace("server")
//!             .accessor("port", OptionType::Integer)
//!     }
//!
//!     fn from_options(options: MaterializedOptions) -> Self {
//!         Server(options)
//!     }
//! }
//!
//! let mut module = OptionsModule::from_command_line(&["--server.port=8080"]);
//! module.contract::<Server>()?;
//!
//! let mut registry = OptionsRegistry::new();
//! module.configure(&mut registry);
//!
//! assert_eq!(registry.instance::<Server>().unwrap().port(), 8080);
//! # Ok::<(), options_core::OptionsError>(())
//! ```

pub mod aggregator;
pub mod binder;
pub mod contract;
pub mod converter;
pub mod errors;
pub mod materializer;
pub mod module;
pub mod resolver;
pub mod sources;

pub use aggregator::{parse_command_line, MergedOptions, OptionOrigin, OptionsAggregator};
pub use binder::{OptionsBinder, OptionsRegistry};
pub use contract::{
    AccessorDescriptor, ContractDescriptor, ContractShape, DefaultBody, OptionsContract,
};
pub use converter::{FromOptionValue, OptionType, OptionTypeConverter, OptionValue};
pub use errors::{OptionsError, OptionsResult, SourceError};
pub use materializer::{materialize, MaterializedOptions};
pub use module::{ConfigureSummary, OptionsModule};
pub use resolver::{ContractOutcome, ContractRegistry, ResolvedContract, ResolvedValue};
pub use sources::{MapSource, OptionSource, PropertiesSource, TomlSectionSource, YamlSectionSource};
