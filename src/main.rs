//! Modal Plus CLI
//!
//! Asks a question through a modal confirm dialog rendered in the terminal.
//!
//! # Usage
//!
//! ```bash
//! modal-plus-cli confirm --message "Delete item?" --buttons ok-cancel
//! modal-plus-cli info --message "Backup finished" --title "Backup"
//! modal-plus-cli --config modal-plus.json confirm -m "Overwrite file?" -b yes-no-cancel
//! ```
//!
//! The answer is printed as JSON. Exit code is 1 when the answer is Cancel or No.

mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use modal_plus::{DialogButtonResult, DialogButtons, ModalPlusConfig, NoLocalizer};

#[derive(Parser, Debug)]
#[command(name = "modal-plus-cli")]
#[command(about = "Ask questions through a modal confirm dialog in the terminal")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (cultures, dialog options)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question and wait for a button
    Confirm {
        #[arg(long, short)]
        message: String,
        #[arg(long, short)]
        title: Option<String>,
        /// Button combination: ok, ok-cancel, yes-no, yes-no-cancel
        #[arg(long, short, default_value = "ok-cancel", value_parser = parse_buttons)]
        buttons: DialogButtons,
    },

    /// Show a message with a single OK button
    Info {
        #[arg(long, short)]
        message: String,
        #[arg(long, short)]
        title: Option<String>,
    },
}

fn parse_buttons(s: &str) -> Result<DialogButtons, String> {
    s.parse::<DialogButtons>().map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ModalPlusConfig::load(path)?,
        None => ModalPlusConfig::default(),
    };
    // The CLI always needs the service, whatever the file says
    let config = ModalPlusConfig {
        register_service: true,
        ..config
    };

    let setup = modal_plus::register(config, Arc::new(NoLocalizer))?;
    let service = setup
        .service()
        .ok_or_else(|| anyhow::anyhow!("dialog service was not registered"))?;
    let dialog = setup.new_dialog();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .build()?;

    rt.block_on(service.bind(&dialog));

    let (message, title, buttons) = match args.command {
        Commands::Confirm {
            message,
            title,
            buttons,
        } => (message, title, buttons),
        Commands::Info { message, title } => (message, title, DialogButtons::Ok),
    };
    info!("Asking: {} ({:?})", message, buttons);

    let request = rt.spawn(async move {
        service
            .request_confirmation(&message, title.as_deref(), buttons)
            .await
    });

    // Terminal presentation runs on the main thread
    let result = match terminal::run(dialog, &rt, request)? {
        Ok(result) => result,
        Err(e) => {
            error!("Dialog request failed: {}", e);
            return Err(e.into());
        }
    };

    let output = json!({
        "result": result,
        "timestamp": chrono::Utc::now().timestamp(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if matches!(result, DialogButtonResult::Cancel | DialogButtonResult::No) {
        std::process::exit(1);
    }

    Ok(())
}
