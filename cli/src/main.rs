use clap::{Parser, Subcommand};
use pxwatch_cli::{commands, readline};
use pxwatch_core::app_state::AppState;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let state = Arc::new(RwLock::new(AppState::new()));

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    state.write().await.stop_sampling();
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the background sample loop
    Start,
    /// Stop the background sample loop
    Stop,
    /// Fetch the latest value for a named offset
    Get {
        #[arg(short, long)]
        name: String,
    },
    /// List configured offsets
    List,
    /// Dump every cached value
    Snapshot,
    /// Show the active calibration
    Config,
    /// Capture the swatch region once and write it as a BMP
    Export {
        #[arg(short, long)]
        path: String,
    },
    Exit,
}

async fn respond(line: &str, state: Arc<RwLock<AppState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "pxwatch".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Start) => commands::start(Arc::clone(&state)).await,
        Some(Commands::Stop) => commands::stop(Arc::clone(&state)).await,
        Some(Commands::Get { name }) => commands::get(name, Arc::clone(&state)).await,
        Some(Commands::List) => commands::list(Arc::clone(&state)).await,
        Some(Commands::Snapshot) => commands::snapshot(Arc::clone(&state)).await,
        Some(Commands::Config) => commands::show_config(Arc::clone(&state)).await,
        Some(Commands::Export { path }) => commands::export(path, Arc::clone(&state)).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
