mod cli;
mod commands;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flowgate_core::{InMemoryGateway, PersistenceGateway, ProcessData};
use flowgate_persistence::{DbConfig, PgGateway};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{describe, engine_with, load_definition, render_history, render_report, simulate};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                             .with_writer(std::io::stderr)
                             .init();

    let cli = Cli::parse();
    let config = cli.engine.config();
    match cli.command {
        Commands::Validate { definition } => {
            let def = load_definition(&definition)?;
            print!("{}", describe(&def));
        }
        Commands::Simulate { definition,
                             jumps,
                             actor,
                             data,
                             postgres, } => {
            let def = load_definition(&definition)?;
            let id = def.id().to_string();
            let data: ProcessData = data.into_iter().collect();
            let report = if postgres {
                let gateway = PgGateway::connect(&DbConfig::from_env()?).context("connecting to Postgres")?;
                simulate(&mut engine_with(gateway, def, config), &id, &jumps, actor, &data)?
            } else {
                simulate(&mut engine_with(InMemoryGateway::new(), def, config), &id, &jumps, actor, &data)?
            };
            print!("{}", render_report(&report));
        }
        Commands::History { instance } => {
            let gateway = PgGateway::connect(&DbConfig::from_env()?).context("connecting to Postgres")?;
            let Some(stored) = gateway.instance(instance)? else {
                bail!("instance {instance} not found");
            };
            println!("instance {} definition={} status={} current={}",
                     stored.instance_id, stored.definition_id, stored.status, stored.current);
            print!("{}", render_history(&gateway.processes(instance)?));
        }
    }
    Ok(())
}
