use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// websync - project org tables to JSON and mirror them to a remote store
#[derive(Parser, Debug)]
#[command(name = "websync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Extra config file, applied after the user and project layers (repeatable)
    #[arg(short, long = "config", value_name = "FILE", global = true)]
    pub config: Vec<PathBuf>,

    /// Print one JSON object per notice
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the source and mirror trees until interrupted (default)
    Watch,

    /// Run the table pipeline once for one source file
    Convert {
        /// Source file, routed by name like a watched change
        file: PathBuf,
    },

    /// Print a named table from a file as JSON
    Parse {
        file: PathBuf,

        /// Table name, without the `tab:` prefix
        #[arg(short, long)]
        table: String,
    },

    /// Push one mirror file to the remote store
    Push {
        /// File below the mirror root
        file: PathBuf,
    },

    /// Create missing table outputs with an empty payload
    Seed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_subcommand() {
        let cli = Cli::try_parse_from(["websync"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_empty());
    }

    #[test]
    fn test_cli_parse_watch() {
        let cli = Cli::try_parse_from(["websync", "watch"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Watch)));
    }

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::try_parse_from(["websync", "convert", "buy.txt"]).unwrap();
        if let Some(Commands::Convert { file }) = cli.command {
            assert_eq!(file, PathBuf::from("buy.txt"));
        } else {
            panic!("Expected Convert command");
        }
    }

    #[test]
    fn test_cli_parse_parse_requires_table() {
        assert!(Cli::try_parse_from(["websync", "parse", "buy.txt"]).is_err());

        let cli = Cli::try_parse_from(["websync", "parse", "buy.txt", "--table", "buy"]).unwrap();
        if let Some(Commands::Parse { file, table }) = cli.command {
            assert_eq!(file, PathBuf::from("buy.txt"));
            assert_eq!(table, "buy");
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_parse_push() {
        let cli = Cli::try_parse_from(["websync", "push", "/m/data/buy.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Push { .. })));
    }

    #[test]
    fn test_cli_config_repeatable() {
        let cli = Cli::try_parse_from([
            "websync", "-c", "a.toml", "seed", "--config", "b.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.config,
            vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
        );
        assert!(matches!(cli.command, Some(Commands::Seed)));
    }

    #[test]
    fn test_cli_json_after_subcommand() {
        let cli = Cli::try_parse_from(["websync", "watch", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["websync", "-vv", "seed"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
