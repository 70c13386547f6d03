//! Definition example.
//!
//! Declares a command in YAML, validates it, prints its help and parses a
//! few token lists against it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p clop-demos --example definition
//! ```

use clop_core::{Command, CommandDefinition, validate_definition};

const ARCHIVE_YAML: &str = "\
name: archive
arguments:
  - name: FILE
    description: files to add
options:
  - switch: -v
    description: list files as they are added
  - switch: --output
    value: PATH
    description: archive to write
  - switch: --output
    value: PATH
    description: shadowed by the first --output
";

fn main() {
    let definition = match CommandDefinition::from_yaml(ARCHIVE_YAML) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("Failed to parse definition: {e}");
            std::process::exit(1);
        }
    };

    println!("=== Validation ===");
    for problem in validate_definition(&definition) {
        println!("  {problem}");
    }
    println!();

    println!("=== Help ===");
    print!("{}", definition.instantiate().help());
    println!();

    println!("=== Parsing ===");
    let inputs: [&[&str]; 4] = [
        &["-v", "--output", "out.tar", "a.txt", "b.txt"],
        &["--", "-v"],
        &["--verbose"],
        &["-vv"],
    ];
    for tokens in inputs {
        let mut archive = definition.instantiate();
        match archive.parse(tokens.iter().copied()) {
            Ok(()) => println!(
                "{tokens:?} => v={} output={:?} arguments={:?}",
                archive.attributes().flag("v"),
                archive.attributes().value("output"),
                archive.arguments()
            ),
            Err(e) => println!("{tokens:?} => error: {e}"),
        }
    }
}
