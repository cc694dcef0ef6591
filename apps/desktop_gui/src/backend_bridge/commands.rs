//! Backend commands queued from UI to backend worker.

use client_core::SubmissionToken;
use shared::protocol::PreregistrationRequest;

pub enum BackendCommand {
    Submit {
        token: SubmissionToken,
        request: PreregistrationRequest,
    },
    CheckBackend,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit { .. } => "submit",
            BackendCommand::CheckBackend => "check_backend",
        }
    }
}
