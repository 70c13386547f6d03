//! Declarative command-line option parsing.
//!
//! This crate provides the building blocks for small commands that parse
//! their own argument lists:
//!
//! - [`CommandOption`] — a flag (`-v`, `--verbose`) or value option
//!   (`--output FILE`) with a description.
//! - [`Argument`] — a documented positional argument.
//! - [`Registry`] — the ordered declarations for one command type, from
//!   which help text is generated.
//! - [`Command`] — the trait concrete commands implement; provides
//!   [`parse`](Command::parse), [`run`](Command::run) and
//!   [`help`](Command::help).
//! - [`CommandDefinition`] — a command declared in a YAML/JSON file.
//!
//! Parse failures come back as [`Error`]; user mistakes are
//! [`Error::Usage`] and carry the command's help text.
//!
//! # Example
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use clop_core::*;
//!
//! struct Serve {
//!     state: CommandState,
//!     port: u16,
//! }
//!
//! impl Command for Serve {
//!     fn registry(&self) -> &Registry {
//!         static REGISTRY: OnceLock<Registry> = OnceLock::new();
//!         REGISTRY.get_or_init(|| {
//!             Registry::new()
//!                 .flag("-v", "log requests")
//!                 .value("--port", "PORT", "port to listen on")
//!                 .argument("ROOT", "directory to serve")
//!         })
//!     }
//!
//!     fn state(&self) -> &CommandState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut CommandState {
//!         &mut self.state
//!     }
//!
//!     fn execute(&mut self) -> Result<()> {
//!         let port = self.attributes().value("port").map(str::parse::<u16>);
//!         if let Some(Ok(port)) = port {
//!             self.port = port;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut serve = Serve { state: CommandState::new("serve"), port: 8080 };
//! serve.run(["--port", "3000", "public"]).unwrap();
//! assert_eq!(serve.port, 3000);
//! assert_eq!(serve.arguments(), ["public"]);
//!
//! let err = serve.parse(["--bogus"]).unwrap_err();
//! assert_eq!(err.to_string(), "Unrecognised option '--bogus'");
//! ```

mod command;
mod definition;
mod error;
mod registry;
mod types;
mod validate;

pub use command::{
    Attributes, Command, CommandState, END_OF_OPTIONS, MissingValue, ParseConfig, is_switch,
    leading_switch,
};
pub use definition::{CommandDefinition, DefinedCommand, DefinitionFormat};
pub use error::{Error, Result, UsageError};
pub use registry::{COMMAND_PLACEHOLDER, Registry};
pub use types::*;
pub use validate::{ValidationError, validate_definition, validate_registry};
