//! Parcel tracker command-line driver.
//!
//! # Responsibility
//! - Build `TrackerConfig` from flags and environment.
//! - Wire logging, the SQLite store and the lifecycle service.
//! - Render parcels as human-readable text or JSON.

mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use parcel_core::config::DEFAULT_DB_FILE_NAME;
use parcel_core::{
    default_log_level, ClientId, ParcelNumber, ParcelService, ParcelStore,
    SqliteParcelRepository, TrackerConfig,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parcel")]
#[command(about = "Track parcels through registration, sending and delivery")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PARCEL_DB", default_value = DEFAULT_DB_FILE_NAME, global = true)]
    db: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "PARCEL_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; no file logging when unset
    #[arg(long, env = "PARCEL_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new parcel
    Register {
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        address: String,
    },
    /// Change the address of a registered parcel
    ChangeAddress { number: ParcelNumber, address: String },
    /// Move a parcel to its next status
    Advance { number: ParcelNumber },
    /// Delete a parcel if it is still registered
    Delete { number: ParcelNumber },
    /// Show one parcel
    Show { number: ParcelNumber },
    /// List all parcels of a client
    List {
        #[arg(long)]
        client: ClientId,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the register/change/advance/delete walkthrough
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[arg(long, default_value_t = 1)]
    client: ClientId,
    #[arg(long, default_value = "Pskov, Pushkin st. 5")]
    address: String,
    #[arg(long, default_value = "Saratov, Kozlov st. 25")]
    new_address: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    config
        .init_logging()
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let conn = config
        .open_db()
        .with_context(|| format!("failed to open database `{}`", config.db_path().display()))?;
    let store = SqliteParcelRepository::try_new(&conn).context("database is not ready")?;
    let mut service = ParcelService::new(store);

    run(&mut service, cli.command)
}

fn build_config(cli: &Cli) -> TrackerConfig {
    let mut config = TrackerConfig::new(&cli.db)
        .with_log_level(cli.log_level.as_deref().unwrap_or(default_log_level()));
    if let Some(log_dir) = &cli.log_dir {
        config = config.with_log_dir(log_dir);
    }
    config
}

fn run<S: ParcelStore>(service: &mut ParcelService<S>, command: Command) -> Result<()> {
    match command {
        Command::Register { client, address } => {
            let parcel = service.register(client, address)?;
            println!("{}", render::parcel_line(&parcel));
        }
        Command::ChangeAddress { number, address } => {
            service.change_address(number, &address)?;
            println!("{}", render::parcel_line(&service.get(number)?));
        }
        Command::Advance { number } => {
            service.advance_status(number)?;
            println!("{}", render::parcel_line(&service.get(number)?));
        }
        Command::Delete { number } => {
            service.delete(number)?;
            println!("{}", render::delete_outcome(number, service.get(number))?);
        }
        Command::Show { number } => {
            println!("{}", render::parcel_line(&service.get(number)?));
        }
        Command::List { client, json } => {
            let parcels = service.list_by_client(client)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parcels)?);
            } else {
                print!("{}", render::client_parcels(client, &parcels));
            }
        }
        Command::Demo(args) => run_demo(service, &args)?,
    }
    Ok(())
}

/// Walks one client through the whole lifecycle, stopping at the first error.
fn run_demo<S: ParcelStore>(service: &mut ParcelService<S>, args: &DemoArgs) -> Result<()> {
    info!("event=demo_run module=cli status=start client={}", args.client);

    let parcel = service
        .register(args.client, args.address.as_str())
        .context("register")?;
    service
        .change_address(parcel.number, &args.new_address)
        .context("change address")?;
    service
        .advance_status(parcel.number)
        .context("advance status")?;
    print_client(service, args.client)?;

    // Already sent, so this must leave the parcel in place.
    service.delete(parcel.number).context("delete sent parcel")?;
    print_client(service, args.client)?;

    let fresh = service
        .register(args.client, args.address.as_str())
        .context("register second parcel")?;
    service
        .delete(fresh.number)
        .context("delete registered parcel")?;
    print_client(service, args.client)?;

    info!("event=demo_run module=cli status=ok client={}", args.client);
    Ok(())
}

fn print_client<S: ParcelStore>(service: &ParcelService<S>, client: ClientId) -> Result<()> {
    let parcels = service
        .list_by_client(client)
        .with_context(|| format!("list parcels of client {client}"))?;
    print!("{}", render::client_parcels(client, &parcels));
    Ok(())
}
