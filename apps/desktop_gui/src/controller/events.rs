//! Events sent from the backend worker to the UI thread.

use client_core::{SubmissionToken, SubmitError};
use shared::protocol::PreregistrationResult;

pub enum UiEvent {
    WorkerReady {
        endpoint: String,
    },
    WorkerFailed(String),
    SubmitFinished {
        token: SubmissionToken,
        outcome: Result<PreregistrationResult, SubmitError>,
    },
    BackendHealth {
        ok: bool,
        service: Option<String>,
    },
}
