use clap::{Parser as ClapParser, Subcommand};
use sift_lang::cli::{self, CheckResult, CliError, FilterOptions, PropertyOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sift")]
#[command(about = "Sift - filter and custom-property expression languages for catalog scans")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a filter against a JSON item
    Filter {
        /// The filter source
        source: String,

        /// JSON item (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Derive custom properties from a JSON item
    Property {
        /// The property definition list
        definitions: String,

        /// JSON item (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Filter {
            source,
            input,
            syntax_only,
        } => run_filter(source, input, syntax_only),
        Commands::Property {
            definitions,
            input,
            pretty,
            syntax_only,
        } => run_property(definitions, input, pretty, syntax_only),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_filter(source: String, input: Option<String>, syntax_only: bool) -> Result<(), CliError> {
    let input = read_input(input)?;

    let options = FilterOptions {
        source,
        input,
        syntax_only,
    };

    match cli::check_filter(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            println!("{}", serde_json::to_string(&output).unwrap());
        }
    }
    Ok(())
}

fn run_property(
    definitions: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = read_input(input)?;

    let options = PropertyOptions {
        source: definitions,
        input,
        syntax_only,
    };

    match cli::check_properties(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .unwrap();
            println!("{}", json);
        }
    }
    Ok(())
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}
