//! Per-command-type declaration tables and help generation.
//!
//! A [`Registry`] is built once, with the consuming builder methods, when a
//! command type is first used. After that it is only read: the parser looks
//! options up in it and [`Registry::help`] renders help from it.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::types::{Argument, ArgumentKind, CommandOption};

/// Placeholder for the command name in registry-level help text.
///
/// [`Command::help`](crate::Command::help) replaces it with the instance's
/// name.
pub const COMMAND_PLACEHOLDER: &str = "__COMMAND__";

/// Ordered options, arguments and usage lines for one command type.
///
/// # Examples
///
/// ```
/// use clop_core::Registry;
///
/// let registry = Registry::new()
///     .flag("-v", "be verbose")
///     .value("--output", "FILE", "where to write")
///     .argument("SOURCE", "file to read");
///
/// assert!(registry.has_options());
/// assert!(registry.find_option("--output").is_some());
/// assert!(registry.find_option("--out").is_none());
/// assert_eq!(registry.derived_usage(), "SOURCE");
///
/// let help = registry.help();
/// assert!(help.starts_with("Usage:\n    __COMMAND__ [OPTIONS] SOURCE\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Explicit usage lines; empty means "derive one from the arguments"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    usages: Vec<String>,
    /// Documented positional arguments
    #[serde(default)]
    arguments: Vec<Argument>,
    /// Declared options, in declaration order
    #[serde(default)]
    options: Vec<CommandOption>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an option.
    ///
    /// Switches are not checked for uniqueness here; lookup returns the
    /// first declaration, so a later duplicate is never found. Use
    /// [`validate_registry`](crate::validate_registry) to catch that.
    pub fn option(self, switch: &str, kind: ArgumentKind, description: &str) -> Self {
        self.with_option(CommandOption::new(switch, kind, description))
    }

    /// Declares a flag option.
    pub fn flag(self, switch: &str, description: &str) -> Self {
        self.with_option(CommandOption::flag(switch, description))
    }

    /// Declares a value-taking option with a help placeholder.
    pub fn value(self, switch: &str, placeholder: &str, description: &str) -> Self {
        self.with_option(CommandOption::value(switch, placeholder, description))
    }

    /// Appends an already-built option descriptor.
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Declares a positional argument (documentation only).
    pub fn argument(mut self, name: &str, description: &str) -> Self {
        self.arguments.push(Argument::new(name, description));
        self
    }

    /// Declares an explicit usage line.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usages.push(usage.to_string());
        self
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Explicitly declared usage lines (may be empty).
    pub fn usages(&self) -> &[String] {
        &self.usages
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Finds the first option whose switch is exactly `switch`.
    pub fn find_option(&self, switch: &str) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.matches(switch))
    }

    /// Usage line derived from the argument names, joined by single spaces.
    pub fn derived_usage(&self) -> String {
        self.arguments
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Usage lines shown in help: the declared ones, or the derived one.
    pub fn usage_lines(&self) -> Vec<String> {
        if self.usages.is_empty() {
            vec![self.derived_usage()]
        } else {
            self.usages.clone()
        }
    }

    /// Renders help text with [`COMMAND_PLACEHOLDER`] standing in for the
    /// command name.
    ///
    /// Sections appear in a fixed order (usage, arguments, options) and are
    /// separated by blank lines. The arguments and options sections are
    /// omitted when nothing is declared.
    pub fn help(&self) -> String {
        let mut help = String::new();

        let mut command = COMMAND_PLACEHOLDER.to_string();
        if self.has_options() {
            command.push_str(" [OPTIONS]");
        }

        let _ = writeln!(help, "Usage:");
        for usage in self.usage_lines() {
            let line = format!("    {command} {usage}");
            let _ = writeln!(help, "{}", line.trim_end());
        }

        if !self.arguments.is_empty() {
            let _ = writeln!(help, "\nArguments:");
            for argument in &self.arguments {
                let _ = writeln!(help, "    {}", argument.help());
            }
        }

        if !self.options.is_empty() {
            let _ = writeln!(help, "\nOptions:");
            for option in &self.options {
                let _ = writeln!(help, "    {}", option.help());
            }
        }

        help
    }
}
