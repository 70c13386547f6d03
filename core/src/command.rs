//! Command instances and the token-scanning parser.
//!
//! A concrete command implements [`Command`]: it hands out its type's
//! [`Registry`] and a [`CommandState`] to populate, and usually overrides
//! [`Command::execute`]. Everything else (parse, run, help) is provided.
//!
//! # Parsing
//!
//! Leading tokens that start with `-` are consumed as switches until the
//! first token that doesn't, or until a bare `--` (which is dropped). What
//! remains becomes the command's positional [`arguments`](Command::arguments),
//! untouched and in order.
//!
//! Only the switch at the start of a token is looked up. Anything after it
//! is ignored, so `-vx` resolves `-v` and `--name=x` resolves `--name`.
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use clop_core::{Command, CommandState, Registry};
//!
//! struct Cp {
//!     state: CommandState,
//! }
//!
//! impl Command for Cp {
//!     fn registry(&self) -> &Registry {
//!         static REGISTRY: OnceLock<Registry> = OnceLock::new();
//!         REGISTRY.get_or_init(|| {
//!             Registry::new()
//!                 .flag("-f", "overwrite existing files")
//!                 .value("--mode", "MODE", "permissions for the copy")
//!                 .argument("SOURCE", "file to copy")
//!                 .argument("DEST", "where to copy it")
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
//! }
//!
//! let mut copy = Cp { state: CommandState::new("cp") };
//! copy.parse(["-f", "--mode", "644", "a.txt", "b.txt"]).unwrap();
//!
//! assert!(copy.attributes().flag("f"));
//! assert_eq!(copy.attributes().value("mode"), Some("644"));
//! assert_eq!(copy.arguments(), ["a.txt", "b.txt"]);
//! assert!(copy.help().starts_with("Usage:\n    cp [OPTIONS] SOURCE DEST\n"));
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result, UsageError};
use crate::registry::{COMMAND_PLACEHOLDER, Registry};
use crate::types::{CommandOption, Value};

/// Token that ends option scanning.
pub const END_OF_OPTIONS: &str = "--";

/// Switch at the start of a token: `-x` or `--word`, where the long form
/// may contain single inner dashes (`--dry-run`). Word characters are ASCII.
static SWITCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\A(?:--\w+(?:-\w+)*|-\w)").expect("static regex must compile")
});

/// Returns the switch spelling at the start of `token`, if any.
///
/// ```
/// use clop_core::leading_switch;
///
/// assert_eq!(leading_switch("--dry-run"), Some("--dry-run"));
/// assert_eq!(leading_switch("-vx"), Some("-v"));
/// assert_eq!(leading_switch("--out=file"), Some("--out"));
/// assert_eq!(leading_switch("---"), None);
/// assert_eq!(leading_switch("-\u{e9}"), None);
/// ```
pub fn leading_switch(token: &str) -> Option<&str> {
    SWITCH_RE.find(token).map(|m| m.as_str())
}

/// Returns `true` if the whole of `token` is a switch.
///
/// ```
/// use clop_core::is_switch;
///
/// assert!(is_switch("-v"));
/// assert!(is_switch("--dry-run"));
/// assert!(!is_switch("--"));
/// assert!(!is_switch("-vx"));
/// assert!(!is_switch("--out=file"));
/// ```
pub fn is_switch(token: &str) -> bool {
    leading_switch(token) == Some(token)
}

/// What to do when a value-taking option is the last token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValue {
    /// Record the option as present without a value (the default).
    #[default]
    Absent,
    /// Fail with a [`UsageError`].
    Reject,
}

/// Parser behaviour settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Handling of a value option with no following token.
    #[serde(default)]
    pub missing_value: MissingValue,
}

impl ParseConfig {
    /// Config that rejects value options missing their value.
    pub fn strict() -> Self {
        Self {
            missing_value: MissingValue::Reject,
        }
    }
}

/// Option values stored on a command instance, keyed by attribute name.
///
/// An attribute that was never written reads as unset: [`flag`](Self::flag)
/// returns `false` and [`value`](Self::value) returns `None`. A value option
/// that appeared without its value is stored as present-but-empty, so
/// [`is_set`](Self::is_set) is `true` while [`value`](Self::value) is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, Option<Value>>,
}

impl Attributes {
    /// Writes an attribute, replacing any earlier value.
    pub fn set(&mut self, name: &str, value: Option<Value>) {
        self.values.insert(name.to_string(), value);
    }

    /// Returns the stored value, if the attribute was written with one.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Reads a flag attribute; unset reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Reads a value attribute.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns `true` if the attribute was written at all.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over written attributes in name order. The value is `None`
    /// for a value option that appeared without its value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of written attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-invocation state of a command: its name, parsed attributes and
/// residual positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandState {
    #[serde(rename = "command")]
    name: String,
    attributes: Attributes,
    arguments: Vec<String>,
}

impl CommandState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// A command that can be parsed from tokens and run.
pub trait Command {
    /// The option and argument declarations shared by every instance of
    /// this command type.
    fn registry(&self) -> &Registry;

    fn state(&self) -> &CommandState;

    fn state_mut(&mut self) -> &mut CommandState;

    /// Parser settings for this command.
    fn parse_config(&self) -> ParseConfig {
        ParseConfig::default()
    }

    /// Command name used in help and error messages.
    fn name(&self) -> &str {
        self.state().name()
    }

    fn attributes(&self) -> &Attributes {
        self.state().attributes()
    }

    /// Positional tokens left over after the last parse.
    fn arguments(&self) -> &[String] {
        self.state().arguments()
    }

    /// Stores a parsed option value.
    ///
    /// `value` is `None` only for a value option that had no following
    /// token. Override this to write typed fields; the default stores into
    /// [`Attributes`] under the option's attribute name.
    fn assign(&mut self, option: &CommandOption, value: Option<Value>) {
        self.state_mut()
            .attributes_mut()
            .set(option.attribute_name(), value);
    }

    /// Runs the command once its attributes are populated.
    ///
    /// # Errors
    ///
    /// The default implementation always returns
    /// [`Error::NotImplemented`].
    fn execute(&mut self) -> Result<()> {
        Err(Error::NotImplemented(self.name().to_string()))
    }

    /// Help text for this command, with the command's name filled in.
    fn help(&self) -> String {
        self.registry().help().replace(COMMAND_PLACEHOLDER, self.name())
    }

    /// Consumes leading switches from `tokens` and stores the rest as the
    /// positional arguments.
    ///
    /// # Errors
    ///
    /// - [`Error::Usage`] for a switch the registry doesn't declare, or for
    ///   a value option missing its value under [`MissingValue::Reject`].
    /// - [`Error::MalformedSwitch`] for a token that starts with `-` but is
    ///   neither `--` nor begins with a switch.
    ///
    /// The first bad token aborts the parse; arguments from any earlier
    /// parse are left as they were.
    fn parse<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        Self: Sized,
    {
        let mut tokens: VecDeque<String> = tokens.into_iter().map(Into::into).collect();
        let config = self.parse_config();
        debug!(command = self.name(), tokens = tokens.len(), "Parsing command line");

        while tokens.front().is_some_and(|t| t.starts_with('-')) {
            let Some(token) = tokens.pop_front() else {
                break;
            };
            if token == END_OF_OPTIONS {
                break;
            }
            let Some(switch) = leading_switch(&token) else {
                return Err(Error::MalformedSwitch(token));
            };

            let option = find_option(&*self, switch)?;
            let value = if option.is_flag() {
                Some(Value::Flag(true))
            } else {
                match tokens.pop_front() {
                    Some(value) => Some(Value::Text(value)),
                    None if config.missing_value == MissingValue::Reject => {
                        let message = format!("option '{switch}' requires a value");
                        return Err(usage_error(&*self, message).into());
                    }
                    None => None,
                }
            };

            debug!(
                command = self.name(),
                token = %token,
                switch = option.switch(),
                attribute = option.attribute_name(),
                "Resolved option"
            );
            self.assign(&option, value);
        }

        self.state_mut().arguments = tokens.into();
        debug!(
            command = self.name(),
            attributes = self.attributes().len(),
            arguments = self.arguments().len(),
            "Parsed command line"
        );
        Ok(())
    }

    /// Parses `tokens`, then executes the command.
    ///
    /// # Errors
    ///
    /// Any error from [`parse`](Self::parse) (in which case `execute` is
    /// not called) or from [`execute`](Self::execute).
    fn run<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        Self: Sized,
    {
        self.parse(tokens)?;
        self.execute()
    }
}

fn find_option<C: Command>(command: &C, switch: &str) -> Result<CommandOption> {
    match command.registry().find_option(switch) {
        Some(option) => Ok(option.clone()),
        None => {
            let message = format!("Unrecognised option '{switch}'");
            Err(usage_error(command, message).into())
        }
    }
}

fn usage_error<C: Command>(command: &C, message: String) -> UsageError {
    UsageError::new(message, command.name(), command.help())
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;

    struct Demo {
        state: CommandState,
        config: ParseConfig,
        executed: bool,
    }

    impl Demo {
        fn new() -> Self {
            Self {
                state: CommandState::new("demo"),
                config: ParseConfig::default(),
                executed: false,
            }
        }
    }

    impl Command for Demo {
        fn registry(&self) -> &Registry {
            static REGISTRY: OnceLock<Registry> = OnceLock::new();
            REGISTRY.get_or_init(|| {
                Registry::new()
                    .flag("-v", "verbose")
                    .flag("--dry-run", "don't do anything")
                    .value("--name", "NAME", "a name")
                    .value("-o", "FILE", "output file")
                    .argument("file", "the file")
            })
        }

        fn state(&self) -> &CommandState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut CommandState {
            &mut self.state
        }

        fn parse_config(&self) -> ParseConfig {
            self.config
        }

        fn execute(&mut self) -> Result<()> {
            self.executed = true;
            Ok(())
        }
    }

    /// Command that keeps the base `execute`.
    struct Bare {
        state: CommandState,
    }

    impl Command for Bare {
        fn registry(&self) -> &Registry {
            static REGISTRY: OnceLock<Registry> = OnceLock::new();
            REGISTRY.get_or_init(Registry::new)
        }

        fn state(&self) -> &CommandState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut CommandState {
            &mut self.state
        }
    }

    #[test]
    fn test_empty_input() {
        let mut demo = Demo::new();
        demo.parse(Vec::<String>::new()).unwrap();
        assert!(demo.arguments().is_empty());
        assert!(demo.attributes().is_empty());
    }

    #[test]
    fn test_plain_tokens_are_positional() {
        let mut demo = Demo::new();
        demo.parse(["a", "b", "-v"]).unwrap();
        assert_eq!(demo.arguments(), ["a", "b", "-v"]);
        assert!(demo.attributes().is_empty());
    }

    #[test]
    fn test_short_and_long_flags() {
        let mut demo = Demo::new();
        demo.parse(["-v", "--dry-run"]).unwrap();
        assert!(demo.attributes().flag("v"));
        assert!(demo.attributes().flag("dry_run"));
        assert!(demo.arguments().is_empty());
    }

    #[test]
    fn test_value_option_consumes_next_token() {
        let mut demo = Demo::new();
        demo.parse(["--name", "V", "rest"]).unwrap();
        assert_eq!(demo.attributes().value("name"), Some("V"));
        assert_eq!(demo.arguments(), ["rest"]);
    }

    #[test]
    fn test_value_is_never_treated_as_switch() {
        let mut demo = Demo::new();
        demo.parse(["-o", "-v", "x"]).unwrap();
        assert_eq!(demo.attributes().value("o"), Some("-v"));
        assert!(!demo.attributes().flag("v"));
        assert_eq!(demo.arguments(), ["x"]);
    }

    #[test]
    fn test_terminator_is_dropped() {
        let mut demo = Demo::new();
        demo.parse(["-v", "--", "-a", "b"]).unwrap();
        assert_eq!(demo.arguments(), ["-a", "b"]);
    }

    #[test]
    fn test_only_first_terminator_is_dropped() {
        let mut demo = Demo::new();
        demo.parse(["--", "--"]).unwrap();
        assert_eq!(demo.arguments(), ["--"]);
    }

    #[test]
    fn test_unrecognised_switch_is_usage_error() {
        let mut demo = Demo::new();
        let err = demo.parse(["--bogus"]).unwrap_err();
        let usage = err.as_usage().expect("usage error");
        assert!(usage.message().contains("--bogus"));
        assert_eq!(usage.command(), "demo");
        assert!(usage.help().contains("Usage:\n    demo [OPTIONS] file"));
    }

    #[test]
    fn test_malformed_switches() {
        for token in ["-", "---", "-=", "-\u{e9}", "--\u{e9}t\u{e9}"] {
            let mut demo = Demo::new();
            let err = demo.parse([token]).unwrap_err();
            match err {
                Error::MalformedSwitch(t) => assert_eq!(t, token),
                other => panic!("expected malformed switch for {token}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_switch_is_taken_from_token_start() {
        let mut demo = Demo::new();
        demo.parse(["-vx", "a"]).unwrap();
        assert!(demo.attributes().flag("v"));
        assert_eq!(demo.attributes().len(), 1);
        assert_eq!(demo.arguments(), ["a"]);

        let mut demo = Demo::new();
        demo.parse(["--name=x", "V"]).unwrap();
        assert_eq!(demo.attributes().value("name"), Some("V"));
        assert!(demo.arguments().is_empty());
    }

    #[test]
    fn test_unrecognised_leading_switch_is_usage_error() {
        for (token, switch) in [("--bogus=1", "--bogus"), ("--dry-", "--dry"), ("-zv", "-z")] {
            let mut demo = Demo::new();
            let err = demo.parse([token]).unwrap_err();
            let usage = err.as_usage().expect("usage error");
            assert_eq!(usage.message(), format!("Unrecognised option '{switch}'"));
        }
    }

    #[test]
    fn test_missing_value_is_absent_by_default() {
        let mut demo = Demo::new();
        demo.parse(["--name"]).unwrap();
        assert!(demo.attributes().is_set("name"));
        assert_eq!(demo.attributes().value("name"), None);
        assert!(demo.arguments().is_empty());
    }

    #[test]
    fn test_missing_value_rejected_when_strict() {
        let mut demo = Demo::new();
        demo.config = ParseConfig::strict();
        let err = demo.parse(["--name"]).unwrap_err();
        let usage = err.as_usage().expect("usage error");
        assert!(usage.message().contains("--name"));
    }

    #[test]
    fn test_attributes_iterate_in_name_order() {
        let mut demo = Demo::new();
        demo.parse(["-v", "--name"]).unwrap();
        let attributes: Vec<_> = demo.attributes().iter().collect();
        assert_eq!(
            attributes,
            [("name", None), ("v", Some(&Value::Flag(true)))]
        );
        assert_eq!(demo.attributes().len(), 2);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let mut demo = Demo::new();
        demo.parse(["--name", "a", "--name", "b"]).unwrap();
        assert_eq!(demo.attributes().value("name"), Some("b"));
    }

    #[test]
    fn test_failed_parse_keeps_previous_arguments() {
        let mut demo = Demo::new();
        demo.parse(["x"]).unwrap();
        assert!(demo.parse(["--bogus", "y"]).is_err());
        assert_eq!(demo.arguments(), ["x"]);
    }

    #[test]
    fn test_run_executes_after_parse() {
        let mut demo = Demo::new();
        demo.run(["-v", "file"]).unwrap();
        assert!(demo.executed);
        assert!(demo.attributes().flag("v"));
    }

    #[test]
    fn test_run_skips_execute_on_parse_error() {
        let mut demo = Demo::new();
        assert!(demo.run(["--bogus"]).is_err());
        assert!(!demo.executed);
    }

    #[test]
    fn test_default_execute_is_not_implemented() {
        let mut bare = Bare {
            state: CommandState::new("bare"),
        };
        let err = bare.run(["x"]).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(ref name) if name == "bare"));
        assert_eq!(bare.arguments(), ["x"]);
    }

    #[test]
    fn test_instance_help_substitutes_name() {
        let demo = Demo::new();
        let help = demo.help();
        assert!(help.starts_with("Usage:\n    demo [OPTIONS] file\n"));
        assert!(!help.contains(COMMAND_PLACEHOLDER));
    }

    #[test]
    fn test_state_serializes_for_reporting() {
        let mut demo = Demo::new();
        demo.parse(["-v", "--name", "x", "f"]).unwrap();
        let json = serde_json::to_value(demo.state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "command": "demo",
                "attributes": {"name": "x", "v": true},
                "arguments": ["f"],
            })
        );
    }
}
