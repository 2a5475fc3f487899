mod commands;
mod logging;

use clap::{Parser, Subcommand};
use commands::*;

#[derive(Parser)]
#[command(name = "fetchlab")]
#[command(about = "Compare relationship loading strategies by the statements they issue")]
struct Cli {
    /// Log every statement (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a database and load it under every strategy
    Compare {
        /// Number of roots to seed
        #[arg(long, default_value_t = 100)]
        roots: usize,

        /// Children per root
        #[arg(long, default_value_t = 3)]
        children: usize,

        /// Batch size for batched lazy loading (defaults to FETCH_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<i64>,

        /// Database URL (defaults to DATABASE_URL, then sqlite::memory:)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Seed a database and print one root with its children
    Inspect {
        /// Root identifier
        #[arg(long)]
        id: i64,

        /// Loading strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::Join)]
        strategy: StrategyArg,

        /// Join resources too (join strategy only)
        #[arg(long)]
        with_resources: bool,

        /// Number of roots to seed
        #[arg(long, default_value_t = 10)]
        roots: usize,

        /// Children per root
        #[arg(long, default_value_t = 3)]
        children: usize,

        /// Batch size for the batched strategy
        #[arg(long)]
        batch_size: Option<i64>,

        /// Database URL (defaults to DATABASE_URL, then sqlite::memory:)
        #[arg(long)]
        database_url: Option<String>,

        /// Print the root as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Compare {
            roots,
            children,
            batch_size,
            database_url,
        } => {
            let config = settings::build(database_url, batch_size)?;
            compare::run(&config, roots, children).await?;
        }
        Commands::Inspect {
            id,
            strategy,
            with_resources,
            roots,
            children,
            batch_size,
            database_url,
            json,
        } => {
            let config = settings::build(database_url, batch_size)?;
            let strategy = strategy.resolve(&config, with_resources)?;
            inspect::run(&config, id, strategy, roots, children, json).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_defaults() {
        let cli = Cli::try_parse_from(["fetchlab", "compare"]).unwrap();
        match cli.command {
            Commands::Compare {
                roots,
                children,
                batch_size,
                database_url,
            } => {
                assert_eq!((roots, children), (100, 3));
                assert_eq!(batch_size, None);
                assert_eq!(database_url, None);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_inspect_requires_id_and_parses_strategy() {
        assert!(Cli::try_parse_from(["fetchlab", "inspect"]).is_err());

        let cli = Cli::try_parse_from(["fetchlab", "-v", "inspect", "--id", "4", "--strategy", "batched"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Inspect {
                id: 4,
                strategy: StrategyArg::Batched,
                ..
            }
        ));
    }
}
