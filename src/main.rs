//! Shared State - inspect and edit the converter's persisted state file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared_state::{AppState, Format, KeyValueStore, Slot, StateConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect and edit the persisted state of the format converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the state file (defaults to the platform data directory)
    #[arg(short, long, env = "SHARED_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every cell
    Show,
    /// Set a persisted slot and sync
    Set {
        /// input-text, input-format or output-format
        slot: Slot,
        value: String,
    },
    /// Reset one slot (or all of them) to the default and sync
    Reset { slot: Option<Slot> },
    /// Convert the input text and print the result
    Convert {
        /// Input format to switch to first
        #[arg(long)]
        from: Option<Format>,
        /// Output format to switch to first
        #[arg(long)]
        to: Option<Format>,
        /// Input text to convert instead of the stored one
        input: Option<String>,
    },
    /// List keys in the state file
    Keys,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    let config = match args.state_file {
        Some(path) => StateConfig::with_state_file(path),
        None => StateConfig::detect(),
    };
    info!("State file: {}", config.state_file().display());

    let store: Arc<dyn KeyValueStore> = Arc::new(
        config
            .open_store()
            .await
            .with_context(|| format!("Failed to open {}", config.state_file().display()))?,
    );

    if let Command::Keys = args.command {
        for key in store.keys().await? {
            println!("{key}");
        }
        return Ok(());
    }

    let state = AppState::open(store)
        .await
        .context("Failed to restore state")?;

    match args.command {
        Command::Show => print_state(&state),
        Command::Set { slot, value } => {
            set_slot(&state, slot, &value)?;
            state.sync().await.context("Failed to sync state")?;
            print_state(&state);
        }
        Command::Reset { slot } => {
            match slot {
                Some(slot) => state.cell(slot).reset(),
                None => state.reset_all(),
            }
            state.sync().await.context("Failed to sync state")?;
            print_state(&state);
        }
        Command::Convert { from, to, input } => {
            if let Some(from) = from {
                state.input_format().set(from.to_string());
            }
            if let Some(to) = to {
                state.output_format().set(to.to_string());
            }
            if let Some(input) = input {
                state.input_text().set(input);
            }
            let output = state.convert().context("Conversion failed")?;
            state.sync().await.context("Failed to sync state")?;
            println!("{output}");
        }
        Command::Keys => {}
    }

    Ok(())
}

fn set_slot(state: &AppState, slot: Slot, value: &str) -> Result<()> {
    match slot {
        Slot::InputText => state.input_text().set(value.to_string()),
        // Store the canonical name so other readers of the file agree on it
        Slot::InputFormat | Slot::OutputFormat => {
            let format = value.parse::<Format>()?;
            state.cell(slot).set(format.to_string());
        }
    }
    Ok(())
}

fn print_state(state: &AppState) {
    println!("{:<14} {}", Slot::InputFormat, state.input_format().get());
    println!("{:<14} {}", Slot::OutputFormat, state.output_format().get());
    println!("{:<14} {}", Slot::InputText, state.input_text().get());
    println!("{:<14} {:?}", "output_text", state.output_text().get());
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Invalid log level")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
