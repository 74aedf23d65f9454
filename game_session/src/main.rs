use anyhow::Context;
use clap::Parser;
use game_session::{MemoryStore, Session, SessionConfig, SessionId};
use std::io::{BufRead, Write};
use std::path::PathBuf;

// cargo run --bin adventure -- --config adventure.toml --world worlds/castle.json

#[derive(Debug, Parser)]
#[command(name = "adventure", version, about = "Play a text adventure in the terminal")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// World document to play instead of the configured or sample world
    #[arg(long)]
    world: Option<PathBuf>,

    /// Print the starting world as JSON and exit
    #[arg(long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("reading configuration from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if args.world.is_some() {
        config.world_file = args.world.clone();
    }

    init_tracing(&config.log_filter);

    let mut store = MemoryStore::new();
    let id = SessionId::new();
    tracing::info!(session = %id, "starting session");

    if args.dump {
        let session = Session::open(&mut store, id, &config)?;
        println!("{}", session.export()?);
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", config.prompt);
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();
        if input == config.exit_command {
            break;
        }

        // Every line is its own request against the stored blob.
        let mut session = Session::open(&mut store, id, &config)?;
        match session.handle_input(input) {
            Ok(response) => println!("{response}"),
            Err(e) => {
                tracing::error!(error = %e, "interaction failed");
                println!("error: {e}");
            }
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
