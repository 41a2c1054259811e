//! Command modules for the optionsctl CLI.
//!
//! - `source_args`: option source selection shared by every command
//! - `dump_cmd`: prints the merged option map and where each key came from
//! - `check_cmd`: resolves and materializes declared contracts

pub mod check_cmd;
pub mod dump_cmd;
pub mod source_args;
