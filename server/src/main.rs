use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use sea_orm_migration::MigratorTrait;
use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
};

use base::setting::{load, Settings, SETTINGS};
use base::{
    database::{get_database, open_database, DATABASE},
    setting::{generate_default, get_settings},
    CLI_NAME,
};
use fyyur::routes::{self, AppState};

#[derive(Parser)]
#[command(name = CLI_NAME,author, version, about, long_about = None)]
#[command(next_line_help = true)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, name = "ADDRESS", default_value_t = String::from("127.0.0.1:5000"))]
    listen_address: String,

    /// Also writes logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    DefaultConfig,
    /// Inserts sample venues, artists and shows
    Seed,
    Serve,
}

async fn prepare(config: Option<PathBuf>) -> Result<&'static Settings> {
    SETTINGS.get_or_try_init(async { load(config) }).await?;
    DATABASE
        .get_or_try_init(async { open_database().await })
        .await?;
    migration::Migrator::up(get_database()?, None).await?;
    Ok(get_settings()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging
    color_eyre::install()?;
    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err("Could not open the log file")?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let tracing_builder = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(file_layer);
    if std::env::var(base::FYYUR_LOGLEVEL).is_ok() {
        tracing_builder.with(EnvFilter::from_env(base::FYYUR_LOGLEVEL))
    } else {
        tracing_builder.with(EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
    .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::DefaultConfig => {
            let mut default = Settings::default();
            default = generate_default(default)?;
            let str = toml::to_string(&default)?;
            println!("{}", str);
            Ok(())
        }
        Command::Seed => {
            prepare(cli.config).await?;
            let seeded = fyyur::seed::seed(get_database()?).await?;
            println!(
                "Inserted {} venues, {} artists and {} shows",
                seeded.venues, seeded.artists, seeded.shows
            );
            Ok(())
        }
        Command::Serve => {
            let settings = prepare(cli.config).await?;
            let addr: SocketAddr = cli
                .listen_address
                .parse()
                .wrap_err("Invalid listen address")?;
            tracing::info! {%addr, "Listening"};
            let state = AppState::new(get_database()?.clone(), settings);
            let router = routes::router(state, &settings.static_dir);
            axum::Server::bind(&addr)
                .serve(router.into_make_service())
                .await?;
            Ok(())
        }
    }
}
