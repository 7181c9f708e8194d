use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use relalg::cli::{
    self, CheckOptions, CheckResult, CliError, ExplainOptions, OutputFormat, SchemaOptions,
};
use std::io::{self, Read};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(ClapParser)]
#[command(name = "relalg")]
#[command(about = "Relalg - parse, analyze and rewrite relational algebra expressions")]
#[command(version)]
struct Cli {
    /// Log rule firings and optimizer rounds
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Tree,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Tree => OutputFormat::Tree,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an expression and print its tree
    Check {
        /// The relational algebra expression
        expression: String,

        /// Rewrite the expression before printing it
        #[arg(short, long)]
        optimize: bool,

        /// Rounds allowed for the optimizer
        #[arg(long)]
        max_rounds: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the attributes the expression produces
    Schema {
        /// The relational algebra expression
        expression: String,

        /// Relation schemas as JSON, e.g. '{"R": ["id", "name"]}' (reads from stdin if not provided)
        #[arg(short, long)]
        relations: Option<String>,

        /// Rewrite the expression first
        #[arg(short, long)]
        optimize: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the operation calls that evaluate the expression
    Explain {
        /// The relational algebra expression
        expression: String,

        /// Rewrite the expression first
        #[arg(short, long)]
        optimize: bool,
    },

    /// Show the operator reference
    Docs,
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("RELALG_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            expression,
            optimize,
            max_rounds,
            format,
            pretty,
            syntax_only,
        } => run_check(CheckOptions {
            expression,
            optimize,
            max_rounds,
            format: format.into(),
            pretty,
            syntax_only,
        }),
        Commands::Schema {
            expression,
            relations,
            optimize,
            pretty,
        } => run_schema(expression, relations, optimize, pretty),
        Commands::Explain {
            expression,
            optimize,
        } => cli::execute_explain(&ExplainOptions {
            expression,
            optimize,
        })
        .map(|trace| println!("{}", trace)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(options: CheckOptions) -> Result<(), CliError> {
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Rendered(output) => println!("{}", output),
    }
    Ok(())
}

fn run_schema(
    expression: String,
    relations: Option<String>,
    optimize: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let relations = match relations {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = SchemaOptions {
        expression,
        relations,
        optimize,
        pretty,
    };
    println!("{}", cli::execute_schema(&options)?);
    Ok(())
}
