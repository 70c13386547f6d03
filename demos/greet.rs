//! Greet example.
//!
//! Runs a hand-written command against the process arguments and prints
//! its help on a usage error.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p clop-demos --example greet -- --greeting Hi -l ann bob
//! cargo run -p clop-demos --example greet -- --bogus
//! ```

use clop_core::{Command, Error};
use clop_demos::Greet;

fn main() {
    let mut greet = Greet::new();

    match greet.run(std::env::args().skip(1)) {
        Ok(()) => println!("{}", greet.output()),
        Err(Error::Usage(usage)) => {
            eprintln!("error: {usage}");
            eprintln!();
            eprint!("{}", usage.help());
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
