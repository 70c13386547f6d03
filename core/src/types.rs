//! Descriptor and value types for command declarations.
//!
//! Options and arguments are plain data: they are declared once per command
//! type, stored in a [`Registry`](crate::Registry), and shared read-only by
//! every instance of that command. The types serialize with [`serde`] so a
//! command can be declared in a definition file as well as in code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of the left-justified name column in help output.
pub const HELP_COLUMN_WIDTH: usize = 31;

/// Formats a `name description` help row with the name padded to
/// [`HELP_COLUMN_WIDTH`].
///
/// The row is not trimmed: an empty description still leaves the padding
/// and separator in place.
pub(crate) fn help_row(name: &str, description: &str) -> String {
    format!("{name:<width$} {description}", width = HELP_COLUMN_WIDTH)
}

/// What an option expects after its switch.
///
/// # Examples
///
/// ```
/// use clop_core::ArgumentKind;
///
/// let kind = ArgumentKind::value("FILE");
/// assert_eq!(kind.placeholder(), Some("FILE"));
/// assert_eq!(ArgumentKind::Flag.placeholder(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    /// No value; presence alone sets the attribute.
    Flag,
    /// Takes the following token as its value. The string is the
    /// placeholder shown in help (e.g. `FILE`).
    Value(String),
}

impl ArgumentKind {
    /// Creates a value-taking kind with the given help placeholder.
    pub fn value(placeholder: &str) -> Self {
        Self::Value(placeholder.to_string())
    }

    /// Returns the help placeholder for value-taking kinds.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Value(placeholder) => Some(placeholder),
        }
    }
}

/// A named option a command accepts.
///
/// The attribute name is derived from the switch once, when the option is
/// created, and is the key the parsed value is stored under.
///
/// # Examples
///
/// ```
/// use clop_core::{ArgumentKind, CommandOption};
///
/// let dry_run = CommandOption::new("--dry-run", ArgumentKind::Flag, "don't do anything");
/// assert_eq!(dry_run.attribute_name(), "dry_run");
/// assert_eq!(dry_run.reader_name(), "dry_run?");
/// assert!(dry_run.is_flag());
///
/// let output = CommandOption::new("-o", ArgumentKind::value("FILE"), "output file");
/// assert_eq!(output.attribute_name(), "o");
/// assert_eq!(output.writer_name(), "o=");
/// assert!(output.help().starts_with("-o FILE"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OptionDecl", into = "OptionDecl")]
pub struct CommandOption {
    switch: String,
    kind: ArgumentKind,
    description: String,
    attribute: String,
}

/// Serialized form of [`CommandOption`]. An option with a `value`
/// placeholder takes a value; one without is a flag. The attribute name is
/// always re-derived rather than read from the file.
#[derive(Serialize, Deserialize)]
struct OptionDecl {
    switch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default)]
    description: String,
}

impl From<OptionDecl> for CommandOption {
    fn from(decl: OptionDecl) -> Self {
        let kind = match decl.value {
            Some(placeholder) => ArgumentKind::Value(placeholder),
            None => ArgumentKind::Flag,
        };
        Self::new(&decl.switch, kind, &decl.description)
    }
}

impl From<CommandOption> for OptionDecl {
    fn from(option: CommandOption) -> Self {
        Self {
            value: option.kind.placeholder().map(String::from),
            switch: option.switch,
            description: option.description,
        }
    }
}

impl CommandOption {
    /// Creates an option descriptor.
    pub fn new(switch: &str, kind: ArgumentKind, description: &str) -> Self {
        Self {
            switch: switch.to_string(),
            kind,
            description: description.to_string(),
            attribute: derive_attribute(switch),
        }
    }

    /// Creates a flag option.
    pub fn flag(switch: &str, description: &str) -> Self {
        Self::new(switch, ArgumentKind::Flag, description)
    }

    /// Creates a value-taking option.
    pub fn value(switch: &str, placeholder: &str, description: &str) -> Self {
        Self::new(switch, ArgumentKind::value(placeholder), description)
    }

    /// The switch exactly as declared (e.g. `--verbose`).
    pub fn switch(&self) -> &str {
        &self.switch
    }

    pub fn kind(&self) -> &ArgumentKind {
        &self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Storage key for this option's value.
    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    /// Returns `true` if the option takes no value.
    pub fn is_flag(&self) -> bool {
        matches!(self.kind, ArgumentKind::Flag)
    }

    /// Name of the reader for this option: the attribute name, with a
    /// trailing `?` for flags.
    pub fn reader_name(&self) -> String {
        if self.is_flag() {
            format!("{}?", self.attribute)
        } else {
            self.attribute.clone()
        }
    }

    /// Name of the writer for this option: the attribute name followed by `=`.
    pub fn writer_name(&self) -> String {
        format!("{}=", self.attribute)
    }

    /// Returns `true` if `switch` is exactly this option's switch.
    ///
    /// There is no prefix or abbreviation matching.
    pub fn matches(&self, switch: &str) -> bool {
        self.switch == switch
    }

    /// Renders the option's line in the `Options:` section of help.
    pub fn help(&self) -> String {
        let lhs = match self.kind.placeholder() {
            Some(placeholder) => format!("{} {}", self.switch, placeholder),
            None => self.switch.clone(),
        };
        help_row(&lhs, &self.description)
    }
}

fn derive_attribute(switch: &str) -> String {
    switch.trim_start_matches('-').replace('-', "_")
}

/// A positional argument, documented in help but never matched against
/// actual tokens.
///
/// # Examples
///
/// ```
/// use clop_core::Argument;
///
/// let file = Argument::new("FILE", "input file");
/// assert_eq!(file.name, "FILE");
/// assert!(file.help().starts_with("FILE "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Name shown in usage and help (e.g. "FILE")
    pub name: String,
    /// Description shown in the `Arguments:` section
    #[serde(default)]
    pub description: String,
}

impl Argument {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// Renders the argument's line in the `Arguments:` section of help.
    pub fn help(&self) -> String {
        help_row(&self.name, &self.description)
    }
}

/// A value stored in a command attribute after parsing.
///
/// Serializes untagged, so flags appear as `true` and values as strings.
/// `Display` prints the same way, without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Set by a flag option.
    Flag(bool),
    /// Set by a value-taking option.
    Text(String),
}

impl Value {
    /// Returns the string for [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Returns the boolean for [`Value::Flag`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(set) => Some(*set),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(set) => write!(f, "{set}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
