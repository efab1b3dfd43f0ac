//! FreshCart CLI - Database migrations, seeding and tool diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! fc-cli migrate
//!
//! # Seed categories, products and profiles
//! fc-cli seed -f crates/cli/seed.yaml
//!
//! # Inspect product matching
//! fc-cli catalog match "tomatoe"
//!
//! # Run a tool as a shopper
//! fc-cli tools call getCartDetails --user <uuid>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog from YAML
//! - `catalog` - List products, resolve free text
//! - `tools` - List tool definitions, execute tool calls

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use freshcart_core::UserId;

mod commands;

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(author, version, about = "FreshCart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from a YAML file
    Seed {
        /// Path to the seed file
        #[arg(short, long)]
        file: String,

        /// Validate the file without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Voice-assistant tools
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every product with stock
    List,
    /// Show how free text resolves to a product
    Match {
        /// What the shopper said
        query: String,
    },
}

#[derive(Subcommand)]
enum ToolsAction {
    /// Print tool definitions as JSON
    List,
    /// Execute a tool and print the response envelope
    Call {
        /// Tool name (camelCase or `snake_case`)
        name: String,

        /// Shopper ID; omit to call as a signed-out shopper
        #[arg(short, long)]
        user: Option<UserId>,

        /// Arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,

        /// Currency reported with amounts
        #[arg(long, default_value = "INR")]
        currency: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, dry_run } => {
            commands::seed::run(&file, dry_run).await?;
        }
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list().await?,
            CatalogAction::Match { query } => commands::catalog::match_query(&query).await?,
        },
        Commands::Tools { action } => match action {
            ToolsAction::List => commands::tools::list()?,
            ToolsAction::Call {
                name,
                user,
                args,
                currency,
            } => {
                commands::tools::call(&name, user, args.as_deref(), &currency).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tool_call() {
        let cli = Cli::try_parse_from([
            "fc-cli",
            "tools",
            "call",
            "addItemToCart",
            "--user",
            "6f1c8a52-3d43-4f4e-9d0e-3c2b6f0f8a11",
            "--args",
            r#"{"productName":"milk"}"#,
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Tools {
                action: ToolsAction::Call { user: Some(_), .. }
            })
        ));
    }
}
