//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{PreregistrationApi, PreregistrationClient, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        let client = match PreregistrationClient::new(&settings) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                tracing::error!("failed to build http client: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::WorkerReady {
            endpoint: settings.endpoint.clone(),
        });

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let client = Arc::clone(&client);
                let ui_tx = ui_tx.clone();
                match cmd {
                    BackendCommand::Submit { token, request } => {
                        tokio::spawn(async move {
                            let outcome = client.create_preregistration(&request).await;
                            forward_event(ui_tx, UiEvent::SubmitFinished { token, outcome }).await;
                        });
                    }
                    BackendCommand::CheckBackend => {
                        tokio::spawn(async move {
                            let event = match client.check_backend().await {
                                Ok(health) => UiEvent::BackendHealth {
                                    ok: health.ok,
                                    service: health.service,
                                },
                                Err(err) => {
                                    tracing::warn!(error = %err, "backend health check failed");
                                    UiEvent::BackendHealth {
                                        ok: false,
                                        service: None,
                                    }
                                }
                            };
                            forward_event(ui_tx, event).await;
                        });
                    }
                }
            }
        });
    });
}

/// Delivers `event` to the UI queue without parking a runtime worker when the queue is full.
async fn forward_event(ui_tx: Sender<UiEvent>, event: UiEvent) {
    let delivered = tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
    if !matches!(delivered, Ok(true)) {
        tracing::warn!("ui event queue closed; dropping backend event");
    }
}
