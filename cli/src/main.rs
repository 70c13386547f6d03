use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clop_core::{
    Command as _, CommandDefinition, CommandState, Error, ParseConfig, UsageError,
    validate_definition,
};
use tracing::debug;

/// Output encoding for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    /// One `name = value` line per attribute.
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "clop")]
#[command(about = "Inspect and exercise command definitions")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log parser decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the help text generated for a definition.
    Help(HelpArgs),
    /// Parse tokens against a definition and print the result.
    Parse(ParseArgs),
    /// Check a definition for unreachable or malformed declarations.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Definition file (.yaml, .yml or .json).
    definition: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Definition file (.yaml, .yml or .json).
    definition: PathBuf,
    /// Reject value options that are missing their value.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, given after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Definition file (.yaml, .yml or .json).
    definition: PathBuf,
}

/// Failure of a subcommand, mapped to an exit status in `main`.
#[derive(Debug)]
enum CliError {
    /// The parsed tokens were rejected; the command's help is printed.
    Usage(UsageError),
    Message(String),
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Help(args) => run_help(args),
        Command::Parse(args) => run_parse(args),
        Command::Check(args) => run_check(args),
    };

    match result {
        Ok(()) => {}
        Err(CliError::Usage(usage)) => {
            eprintln!("error: {usage}");
            eprintln!();
            eprint!("{}", usage.help());
            std::process::exit(2);
        }
        Err(CliError::Message(message)) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "clop=debug,clop_core=debug"
    } else {
        "clop=warn,clop_core=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_definition(path: &Path) -> Result<CommandDefinition, String> {
    debug!(path = %path.display(), "Loading definition");
    CommandDefinition::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn run_help(args: HelpArgs) -> Result<(), CliError> {
    let definition = load_definition(&args.definition)?;
    print!("{}", definition.instantiate().help());
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), CliError> {
    let mut definition = load_definition(&args.definition)?;
    if args.strict {
        definition = definition.with_parse_config(ParseConfig::strict());
    }

    let mut command = definition.instantiate();
    match command.parse(args.tokens) {
        Ok(()) => {}
        Err(Error::Usage(usage)) => return Err(CliError::Usage(usage)),
        Err(err) => return Err(err.to_string().into()),
    }

    let raw = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(command.state())
            .map_err(|err| format!("Failed to serialize parse result: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(command.state())
            .map_err(|err| format!("Failed to serialize parse result: {err}"))?,
        CliOutputFormat::Text => render_text(command.state()),
    };
    println!("{}", raw.trim_end());
    Ok(())
}

fn render_text(state: &CommandState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "command: {}", state.name());
    for (name, value) in state.attributes().iter() {
        match value {
            Some(value) => {
                let _ = writeln!(out, "{name} = {value}");
            }
            None => {
                let _ = writeln!(out, "{name} (no value)");
            }
        }
    }
    for argument in state.arguments() {
        let _ = writeln!(out, "argument: {argument}");
    }
    out
}

fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let definition = load_definition(&args.definition)?;
    let errors = validate_definition(&definition);
    if errors.is_empty() {
        println!(
            "Definition '{}' is valid ({} option(s), {} argument(s)).",
            definition.name,
            definition.registry.options().len(),
            definition.registry.arguments().len()
        );
        return Ok(());
    }

    for error in &errors {
        eprintln!("{}: {error}", args.definition.display());
    }
    Err(format!("{} problem(s) found in '{}'", errors.len(), definition.name).into())
}
