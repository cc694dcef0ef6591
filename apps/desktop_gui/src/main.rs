use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::config::{load_settings, SettingsOverrides};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::PreregistroApp;

/// Keeps a hung backend from holding the submit button disabled.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "preregistro-gui", about = "Visitor pre-registration desktop client")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings(
        args.config.as_deref(),
        &SettingsOverrides {
            endpoint: args.endpoint,
            acting_user_id: args.user_id,
            request_timeout_secs: args.timeout_secs,
        },
    )
    .context("failed to load settings")?
    .with_fallback_timeout(DEFAULT_TIMEOUT_SECS);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Preregistro de visitantes")
            .with_inner_size([480.0, 640.0])
            .with_min_inner_size([380.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Preregistro de visitantes",
        options,
        Box::new(|_cc| Ok(Box::new(PreregistroApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
