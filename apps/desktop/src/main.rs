use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings, SettingsOverrides},
    qr, Coordinator, PreregistrationApi, PreregistrationClient, ScreenView, Transition,
};
use shared::domain::VisitType;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "preregistro", about = "Visitor pre-registration client")]
struct Cli {
    /// TOML config file; defaults to ./preregistro.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    endpoint: Option<String>,
    #[arg(long, global = true)]
    user_id: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the form, submit it, and print the returned QR.
    Submit(SubmitArgs),
    /// Call the backend health check.
    Check,
    /// Print the resolved settings.
    ShowConfig,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    nombre: String,
    /// Local date/time as entered in the picker, e.g. 2024-05-01T10:00.
    #[arg(long, default_value = "")]
    fecha: String,
    #[arg(long, default_value_t = VisitType::Visita)]
    tipo: VisitType,
    #[arg(long, default_value = "")]
    placa: String,
    #[arg(long, default_value = "")]
    notas: String,
    /// Write the decoded PNG here.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let overrides = SettingsOverrides {
        endpoint: cli.endpoint,
        acting_user_id: cli.user_id,
        request_timeout_secs: cli.timeout_secs,
    };
    let settings =
        load_settings(cli.config.as_deref(), &overrides).context("failed to load settings")?;

    match cli.command {
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let client =
                PreregistrationClient::new(&settings).context("failed to build http client")?;
            let health = client
                .check_backend()
                .await
                .with_context(|| format!("backend at {} is not healthy", settings.endpoint))?;
            println!(
                "ok={} service={}",
                health.ok,
                health.service.as_deref().unwrap_or("-")
            );
            Ok(if health.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Submit(args) => {
            let client =
                PreregistrationClient::new(&settings).context("failed to build http client")?;
            submit(&client, args).await
        }
    }
}

async fn submit<A: PreregistrationApi>(api: &A, args: SubmitArgs) -> Result<ExitCode> {
    let mut coordinator = Coordinator::new();
    let form = coordinator.form_mut();
    form.visitor_name = args.nombre;
    form.visit_datetime = args.fecha;
    form.visit_type = args.tipo;
    form.plate = args.placa;
    form.notes = args.notas;

    match coordinator.submit(api).await {
        Transition::Displayed => {}
        other => {
            // Submission errors were already logged by the coordinator.
            tracing::debug!(?other, "form left unchanged");
            return Ok(ExitCode::FAILURE);
        }
    }

    let ScreenView::Display(view) = coordinator.view() else {
        return Ok(ExitCode::FAILURE);
    };
    println!("{}", view.title);
    println!("{}", view.image_src());

    if let Some(path) = args.output {
        let written = qr::write_png(view.qr_base64, &path)
            .with_context(|| format!("failed to save qr to {}", path.display()))?;
        println!("saved {written} bytes to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
