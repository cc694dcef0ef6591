//! Two-screen flow: the pre-registration form and the QR display.

use std::fmt;

use shared::protocol::{PreregistrationRequest, PreregistrationResult};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{error::SubmitError, form::PreregistrationForm, qr, PreregistrationApi};

pub const FORM_TITLE: &str = "Preregistro";
pub const SUBMIT_LABEL: &str = "Generar QR";
pub const DISPLAY_TITLE: &str = "Tu QR";
pub const BACK_LABEL: &str = "Regresar";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Screen {
    #[default]
    Form,
    Display(PreregistrationResult),
}

/// Identifies one outstanding submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionToken(Uuid);

impl SubmissionToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub token: SubmissionToken,
    pub request: PreregistrationRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRefused {
    InFlight,
    NotOnForm,
}

impl fmt::Display for SubmitRefused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRefused::InFlight => f.write_str("a submission is already in flight"),
            SubmitRefused::NotOnForm => f.write_str("the form is not the active screen"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Displayed,
    StayedOnForm,
    Stale,
    Refused(SubmitRefused),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

/// Borrows the payload of the active result; the data URI is built on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayView<'a> {
    pub title: &'static str,
    pub qr_base64: &'a str,
    pub back_label: &'static str,
}

impl DisplayView<'_> {
    pub fn image_src(&self) -> String {
        qr::data_uri(self.qr_base64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView<'a> {
    Form(FormView),
    Display(DisplayView<'a>),
}

/// Holds the form, the active screen, and the in-flight submission token.
#[derive(Debug, Default)]
pub struct Coordinator {
    form: PreregistrationForm,
    screen: Screen,
    in_flight: Option<SubmissionToken>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn form(&self) -> &PreregistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PreregistrationForm {
        &mut self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn view(&self) -> ScreenView<'_> {
        match &self.screen {
            Screen::Form => ScreenView::Form(FormView {
                title: FORM_TITLE,
                submit_label: SUBMIT_LABEL,
                submit_enabled: self.in_flight.is_none(),
            }),
            Screen::Display(result) => ScreenView::Display(DisplayView {
                title: DISPLAY_TITLE,
                qr_base64: &result.qr_base64,
                back_label: BACK_LABEL,
            }),
        }
    }

    /// Snapshots the form into a request and marks it in flight.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitRefused> {
        if !matches!(self.screen, Screen::Form) {
            return Err(SubmitRefused::NotOnForm);
        }
        if self.in_flight.is_some() {
            return Err(SubmitRefused::InFlight);
        }

        let token = SubmissionToken::new();
        self.in_flight = Some(token);
        debug!(%token, "preregistration submit started");
        Ok(PendingSubmission {
            token,
            request: self.form.to_request(),
        })
    }

    /// Applies the outcome of the submission identified by `token`. Errors are
    /// logged here and leave the form untouched.
    pub fn complete(
        &mut self,
        token: SubmissionToken,
        outcome: Result<PreregistrationResult, SubmitError>,
    ) -> Transition {
        if self.in_flight != Some(token) {
            warn!(%token, "ignoring result of a submission that is no longer in flight");
            return Transition::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                info!(%token, "preregistration accepted; showing qr");
                self.screen = Screen::Display(result);
                Transition::Displayed
            }
            Err(err @ SubmitError::Transport(_)) => {
                error!(%token, error = %err, "error generating qr");
                Transition::StayedOnForm
            }
            Err(err) => {
                warn!(%token, error = %err, "error generating qr");
                Transition::StayedOnForm
            }
        }
    }

    /// Releases the in-flight guard for a submission that never reached the backend.
    pub fn abandon(&mut self, token: SubmissionToken) -> bool {
        if self.in_flight != Some(token) {
            return false;
        }
        self.in_flight = None;
        debug!(%token, "preregistration submit abandoned");
        true
    }

    /// Returns to a fresh, empty form. No-op on the form screen.
    pub fn back(&mut self) -> bool {
        if matches!(self.screen, Screen::Form) {
            return false;
        }
        self.screen = Screen::Form;
        self.form.reset();
        true
    }

    /// Runs one full submission against `api`.
    pub async fn submit<A>(&mut self, api: &A) -> Transition
    where
        A: PreregistrationApi + ?Sized,
    {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(refused) => {
                debug!(reason = %refused, "submit refused");
                return Transition::Refused(refused);
            }
        };
        let outcome = api.create_preregistration(&pending.request).await;
        self.complete(pending.token, outcome)
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
