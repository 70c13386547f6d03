//! Command definitions loaded from YAML or JSON.
//!
//! A definition declares a command without writing Rust: a name, the same
//! tables a [`Registry`] holds, and optional parser settings. The format is
//! picked from the file extension.
//!
//! # Example YAML
//!
//! ```yaml
//! name: greet
//! usages:
//!   - "[NAME] ..."
//! arguments:
//!   - name: NAME
//!     description: who to greet
//! options:
//!   - switch: --loud
//!     description: shout the greeting
//!   - switch: --greeting
//!     value: TEXT
//!     description: word to greet with
//! parse:
//!   missing_value: reject
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandState, ParseConfig};
use crate::error::{Error, Result};
use crate::registry::Registry;

/// On-disk encoding of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl DefinitionFormat {
    /// Picks the format from a path's extension (`json`, `yaml`, `yml`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A named command declaration.
///
/// # Examples
///
/// ```
/// use clop_core::{Command, CommandDefinition};
///
/// let yaml = "\
/// name: greet
/// arguments:
///   - name: NAME
///     description: who to greet
/// options:
///   - switch: --loud
///     description: shout
/// ";
///
/// let definition = CommandDefinition::from_yaml(yaml).unwrap();
/// let mut greet = definition.instantiate();
/// greet.parse(["--loud", "world"]).unwrap();
///
/// assert!(greet.attributes().flag("loud"));
/// assert_eq!(greet.arguments(), ["world"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Command name shown in help
    pub name: String,
    /// Declared options, arguments and usage lines
    #[serde(flatten)]
    pub registry: Registry,
    /// Parser settings
    #[serde(default, skip_serializing_if = "is_default_config")]
    pub parse: ParseConfig,
}

fn is_default_config(config: &ParseConfig) -> bool {
    *config == ParseConfig::default()
}

impl CommandDefinition {
    pub fn new(name: &str, registry: Registry) -> Self {
        Self {
            name: name.to_string(),
            registry,
            parse: ParseConfig::default(),
        }
    }

    /// Replaces the parser settings.
    pub fn with_parse_config(mut self, parse: ParseConfig) -> Self {
        self.parse = parse;
        self
    }

    /// Parses a definition from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](Error::YamlError) if parsing fails.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](Error::JsonError) if parsing fails.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a definition from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](Error::UnsupportedFormat) for other
    /// extensions, [`IoError`](Error::IoError) if the file cannot be read,
    /// or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let definition = match format {
            DefinitionFormat::Json => serde_json::from_reader(reader)?,
            DefinitionFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(definition)
    }

    /// Saves the definition, encoded according to the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](Error::UnsupportedFormat) for unknown
    /// extensions, [`IoError`](Error::IoError) if the file cannot be
    /// written, or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        match format {
            DefinitionFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            DefinitionFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Creates a fresh, unparsed command instance backed by this definition.
    pub fn instantiate(&self) -> DefinedCommand<'_> {
        DefinedCommand {
            definition: self,
            state: CommandState::new(&self.name),
        }
    }
}

/// A command instance whose declarations come from a [`CommandDefinition`].
///
/// Instances borrow the definition, so any number of them share one
/// registry. There is no `execute` behaviour: [`Command::run`] parses and
/// then fails with [`Error::NotImplemented`].
#[derive(Debug, Clone)]
pub struct DefinedCommand<'a> {
    definition: &'a CommandDefinition,
    state: CommandState,
}

impl Command for DefinedCommand<'_> {
    fn registry(&self) -> &Registry {
        &self.definition.registry
    }

    fn state(&self) -> &CommandState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CommandState {
        &mut self.state
    }

    fn parse_config(&self) -> ParseConfig {
        self.definition.parse
    }
}
