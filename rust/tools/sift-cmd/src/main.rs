use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "sift-cmd")]
#[command(about = "Command-line utility for exploring text search queries")]
#[command(version)]
struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a JSON file with parser, highlighter and spell checker settings
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and print its tree as JSON
    Parse {
        /// Query string
        query: String,
    },

    /// Search text files, each file being one document
    Search {
        /// Text file(s) to search (can be specified multiple times)
        #[arg(short, long, required = true)]
        file: Vec<String>,

        /// Query string
        query: String,
    },

    /// Print the matching text files with query hits marked up
    Highlight {
        /// Text file(s) to highlight (can be specified multiple times)
        #[arg(short, long, required = true)]
        file: Vec<String>,

        /// Query string
        query: String,
    },

    /// Complete a word fragment against the vocabulary of text files
    Suggest {
        /// Text file(s) providing the vocabulary
        #[arg(short, long, required = true)]
        file: Vec<String>,

        /// Maximum number of suggestions
        #[arg(short, long)]
        limit: Option<usize>,

        /// Word fragment to complete
        input: String,
    },

    /// Correct the spelling of a word against the vocabulary of text files
    Spellcheck {
        /// Text file(s) to train the model on
        #[arg(short, long, required = true)]
        file: Vec<String>,

        /// Number of alternative corrections to list
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Word to correct
        input: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = utils::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { query } => commands::parse::run(&config, query),
        Commands::Search { file, query } => commands::search::run(&config, file, query),
        Commands::Highlight { file, query } => commands::highlight::run(&config, file, query),
        Commands::Suggest { file, limit, input } => {
            commands::suggest::run(file, limit, input)
        }
        Commands::Spellcheck { file, count, input } => {
            commands::spellcheck::run(&config, file, count, input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_arguments() {
        let cli = Cli::try_parse_from([
            "sift-cmd", "-vv", "search", "-f", "a.txt", "--file", "b.txt", "ware helden",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Search { file, query } => {
                assert_eq!(file, vec!["a.txt", "b.txt"]);
                assert_eq!(query, "ware helden");
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_search_requires_files() {
        assert!(Cli::try_parse_from(["sift-cmd", "search", "zee"]).is_err());
    }

    #[test]
    fn test_spellcheck_defaults() {
        let cli = Cli::try_parse_from([
            "sift-cmd", "--config", "search.json", "spellcheck", "-f", "a.txt", "vlot",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("search.json"));
        match cli.command {
            Commands::Spellcheck { count, input, .. } => {
                assert_eq!(count, 5);
                assert_eq!(input, "vlot");
            }
            _ => panic!("expected spellcheck command"),
        }
    }
}
