//! cinemactl - миграции схемы и служебные операции из командной строки.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use cinema_menu::{
    config::Config, database::Database, logging, schema::Migrator, services::ShowService,
};

#[derive(Parser, Debug)]
#[command(name = "cinemactl", version, about = "Cinema schema maintenance")]
struct Cli {
    /// Переопределяет DATABASE_URL
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply or revert schema migrations
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Recompute the cached sold_out flag of shows
    RefreshSoldOut(RefreshArgs),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations, or one migration by name
    Apply(NameArg),
    /// Revert the last applied migration, or one migration by name
    Revert(NameArg),
}

#[derive(Args, Debug)]
struct NameArg {
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct RefreshArgs {
    /// Only this show; all shows when omitted
    #[arg(long)]
    show: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.database_url)?;
    logging::init(&config.app);

    let db = Database::new(&config.database.url, 1)
        .await
        .context("failed to connect to database")?;
    let store = Arc::new(db);

    match cli.command {
        Commands::Migrate(MigrateCommand::Apply(NameArg { name })) => {
            let migrator = Migrator::new(store);
            match name {
                Some(name) => {
                    migrator.apply_named(&name).await?;
                    info!("Applied {}", name);
                }
                None => {
                    let ran = migrator.run_pending().await?;
                    info!("Applied {} migration(s): {:?}", ran.len(), ran);
                }
            }
        }
        Commands::Migrate(MigrateCommand::Revert(NameArg { name })) => {
            let migrator = Migrator::new(store);
            match name {
                Some(name) => {
                    migrator.revert_named(&name).await?;
                    info!("Reverted {}", name);
                }
                None => match migrator.revert_last().await? {
                    Some(name) => info!("Reverted {}", name),
                    None => info!("No applied migrations"),
                },
            }
        }
        Commands::RefreshSoldOut(RefreshArgs { show }) => {
            let updated = ShowService::new(store).refresh_sold_out(show).await?;
            info!("Updated {} show(s)", updated);
        }
    }

    Ok(())
}
