//! Demo commands built on `clop-core`.
//!
//! [`Greet`] is a hand-written command with a static registry and an
//! `execute` that renders its greeting into an output buffer.

use std::sync::OnceLock;

use clop_core::{Command, CommandState, Registry, Result};

/// `greet [OPTIONS] [NAME] ...`
pub struct Greet {
    state: CommandState,
    output: String,
}

impl Greet {
    pub fn new() -> Self {
        Self {
            state: CommandState::new("greet"),
            output: String::new(),
        }
    }

    /// Text produced by the last `execute`.
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Default for Greet {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Greet {
    fn registry(&self) -> &Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::new()
                .flag("-l", "shout the greeting")
                .flag("--loud", "same as -l")
                .value("--greeting", "TEXT", "word to greet with (default: Hello)")
                .argument("NAME", "who to greet (default: world)")
                .usage("[NAME] ...")
        })
    }

    fn state(&self) -> &CommandState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CommandState {
        &mut self.state
    }

    fn execute(&mut self) -> Result<()> {
        let attributes = self.attributes();
        let greeting = attributes.value("greeting").unwrap_or("Hello");
        let names = if self.arguments().is_empty() {
            "world".to_string()
        } else {
            self.arguments().join(", ")
        };

        let mut line = format!("{greeting}, {names}!");
        if attributes.flag("l") || attributes.flag("loud") {
            line = line.to_uppercase();
        }
        self.output = line;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_greeting() {
        let mut greet = Greet::new();
        greet.run(Vec::<String>::new()).unwrap();
        assert_eq!(greet.output(), "Hello, world!");
    }

    #[test]
    fn test_options_and_names() {
        let mut greet = Greet::new();
        greet.run(["--greeting", "Hi", "-l", "ann", "bob"]).unwrap();
        assert_eq!(greet.output(), "HI, ANN, BOB!");
    }

    #[test]
    fn test_help_uses_declared_usage() {
        let help = Greet::new().help();
        assert!(help.starts_with("Usage:\n    greet [OPTIONS] [NAME] ...\n"));
    }
}
