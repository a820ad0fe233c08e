use cedict_pages::{cedict, config, dictionary, generate, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cedict-pages")]
#[command(version, about = "Static reference pages for a Chinese dictionary")]
#[command(long_about = "\
Static reference pages for a Chinese dictionary

Reads a JSON dictionary of headwords with readings, definitions, and nested
character components, and writes one HTML page per headword plus an index.

Input shape (one object per headword):

  {
    \"你好\": {
      \"entry\": {
        \"simplified\": \"你好\", \"traditional\": \"你好\",
        \"pinyin\": [\"nǐ hǎo\"], \"definitions\": [[\"hello\"]]
      },
      \"components\": [
        { \"text\": \"你\", \"position\": [0, 1], \"entry\": { … }, \"components\": [] }
      ]
    }
  }

Output:

  docs/
  ├── index.html     # Grid of links to every headword
  ├── 你好.html
  └── …

Run 'cedict-pages gen-config' to print a documented config.toml.")]
struct Cli {
    /// Dictionary JSON file
    #[arg(long, default_value = "cedict_with_components.json", global = true)]
    input: PathBuf,

    /// Output directory
    #[arg(long, default_value = "docs", global = true)]
    output: PathBuf,

    /// Config file (optional; defaults apply when missing)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log progress details to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site (the default when no command is given)
    Build {
        /// Max documents generated at once (overrides generation.workers)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Load and validate the dictionary without writing anything
    Check,
    /// Convert a CC-CEDICT text file into dictionary JSON
    Convert {
        /// CC-CEDICT source, e.g. cedict_ts.u8
        cedict: PathBuf,
        /// Where to write the JSON (defaults to --input)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        println!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let command = cli.command.unwrap_or(Command::Build { workers: None });

    match command {
        Command::Build { workers } => {
            let build_config = config::load_config(&cli.config)?.with_workers(workers)?;
            let report = generate::generate(&cli.input, &cli.output, &build_config)?;
            output::print_generate_output(&report);
        }
        Command::Check => {
            let dictionary = dictionary::load_dictionary(&cli.input)?;
            let stats = dictionary::dictionary_stats(&dictionary);
            output::print_check_output(&stats, &cli.input);
            println!("==> Dictionary is valid");
        }
        Command::Convert { cedict, out } => {
            let target = out.unwrap_or(cli.input);
            let report = cedict::convert(&cedict, &target)?;
            output::print_convert_output(&report, &cedict, &target);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
