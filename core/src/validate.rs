//! Registry and definition validation.
//!
//! The parser never validates a registry: duplicate switches are legal and
//! the first declaration wins at lookup. These checks are for command
//! authors who want to catch such mistakes before users hit them.
//!
//! # Examples
//!
//! ```
//! use clop_core::*;
//!
//! let registry = Registry::new().flag("-v", "verbose").argument("FILE", "");
//! assert!(validate_registry(&registry).is_empty());
//!
//! // Invalid: second -v is shadowed by the first
//! let bad = Registry::new().flag("-v", "verbose").value("-v", "N", "level");
//! assert_eq!(
//!     validate_registry(&bad),
//!     vec![ValidationError::DuplicateSwitch("-v".to_string())]
//! );
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{ArgumentKind, CommandDefinition, Registry, is_switch};

/// Registry/definition validation errors.
///
/// Each variant describes a declaration that parses but is unlikely to do
/// what its author meant. The `Display` impl provides a human-readable
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Switch is not of the form `-x` or `--word`, so no token can match it.
    #[error("invalid switch format: {0}")]
    InvalidSwitch(String),
    /// Switch declared more than once; later declarations are unreachable.
    #[error("duplicate switch: {0}")]
    DuplicateSwitch(String),
    /// Two different switches store into the same attribute.
    #[error("switches {first} and {second} share attribute {attribute}")]
    AttributeCollision {
        attribute: String,
        first: String,
        second: String,
    },
    /// Value option declared with an empty help placeholder.
    #[error("empty value placeholder for {0}")]
    EmptyPlaceholder(String),
    /// Argument with an empty or whitespace-only name.
    #[error("argument name cannot be empty")]
    EmptyArgumentName,
}

/// Validates a registry and returns every problem found, in declaration
/// order.
pub fn validate_registry(registry: &Registry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut switches: HashSet<&str> = HashSet::new();
    let mut attributes: HashMap<&str, &str> = HashMap::new();

    for option in registry.options() {
        let switch = option.switch();
        if !is_switch(switch) {
            errors.push(ValidationError::InvalidSwitch(switch.to_string()));
        }

        if !switches.insert(switch) {
            errors.push(ValidationError::DuplicateSwitch(switch.to_string()));
            continue;
        }

        if let Some(first) = attributes.insert(option.attribute_name(), switch) {
            errors.push(ValidationError::AttributeCollision {
                attribute: option.attribute_name().to_string(),
                first: first.to_string(),
                second: switch.to_string(),
            });
        }

        if let ArgumentKind::Value(placeholder) = option.kind() {
            if placeholder.trim().is_empty() {
                errors.push(ValidationError::EmptyPlaceholder(switch.to_string()));
            }
        }
    }

    for argument in registry.arguments() {
        if argument.name.trim().is_empty() {
            errors.push(ValidationError::EmptyArgumentName);
        }
    }

    errors
}

/// Validates a command definition: its name, then its registry.
pub fn validate_definition(definition: &CommandDefinition) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if definition.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
    }
    errors.extend(validate_registry(&definition.registry));
    errors
}
