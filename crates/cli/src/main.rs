//! # Plumbline CLI
//!
//! Command-line interface for the Plumbline repair tracking backend.
//!
//! ## Usage
//!
//! ```bash
//! plumbline serve    # Start the API server (runs migrations automatically)
//! plumbline migrate  # Run database migrations
//! plumbline --help   # Show help
//! ```

mod server;

use clap::{Args, CommandFactory as _, Parser, Subcommand};
use error::Result;
use migration::MigratorTrait;

/// Plumbline - construction repair tracking
#[derive(Parser, Debug)]
#[command(name = "plumbline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "PLUMBLINE_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "PLUMBLINE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "PLUMBLINE_PORT", default_value = "3000")]
    pub port: u16,
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Rollback the last migration
    #[arg(long)]
    rollback: bool,
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Plumbline CLI starting...");

    match cli.command {
        Commands::Serve(args) => server::serve(&args).await?,
        Commands::Migrate(args) => migrate(&args).await?,
        Commands::Completions(args) => completions(&args)?,
        Commands::Validate => validate()?,
    }

    Ok(())
}

async fn migrate(args: &MigrateArgs) -> Result<()> {
    logging::info!(target: "migrate", rollback = %args.rollback, "Running database migrations...");

    let db = migration::SeaDb::new().await?;

    if args.rollback {
        migration::Migrator::down(&db.inner, None)
            .await
            .map_err(|e| anyhow::anyhow!("Rollback failed: {}", e))?;

        logging::info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    migration::Migrator::up(&db.inner, None)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    logging::info!(target: "migrate", "Migrations completed successfully");
    Ok(())
}

fn completions(args: &CompletionsArgs) -> Result<()> {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "plumbline",
        &mut std::io::stdout(),
    );
    Ok(())
}

fn validate() -> Result<()> {
    logging::info!(target: "validate", "Validating configuration...");

    // JWT configuration must be present before the server can authenticate
    // anything; database settings always resolve through their defaults.
    ::server::auth::jwt::JwtConfig::from_env()?;

    let db_config = migration::DatabaseConfig::from_env();
    logging::info!(target: "validate",
        host = %db_config.host,
        port = %db_config.port,
        database = %db_config.database,
        "Configuration valid"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["plumbline", "serve", "--host", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["plumbline", "validate"]);
        match cli.command {
            Commands::Validate => {},
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["plumbline", "validate"]);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, "pretty");
    }

    #[test]
    fn test_migrate_rollback() {
        let cli = Cli::parse_from(["plumbline", "migrate", "--rollback"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(args.rollback);
            },
            _ => panic!("Expected Migrate command"),
        }
    }

    #[test]
    fn test_cli_command_factory() {
        let cmd = Cli::command();
        assert!(cmd.get_name() == "plumbline");
    }

    #[test]
    fn test_completions_returns_ok() {
        let args = CompletionsArgs {
            shell: clap_complete::Shell::Bash,
        };
        let result = completions(&args);
        assert!(result.is_ok());
    }
}
