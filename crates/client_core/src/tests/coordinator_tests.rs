use super::*;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use shared::{domain::VisitType, protocol::HealthStatus};

struct ScriptedApi {
    replies: Mutex<Vec<Result<PreregistrationResult, SubmitError>>>,
    seen: Mutex<Vec<PreregistrationRequest>>,
}

impl ScriptedApi {
    fn new(replies: Vec<Result<PreregistrationResult, SubmitError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<PreregistrationRequest> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl PreregistrationApi for ScriptedApi {
    async fn create_preregistration(
        &self,
        request: &PreregistrationRequest,
    ) -> Result<PreregistrationResult, SubmitError> {
        self.seen.lock().expect("seen lock").push(request.clone());
        let mut replies = self.replies.lock().expect("replies lock");
        if replies.is_empty() {
            return Err(SubmitError::MissingQr);
        }
        replies.remove(0)
    }

    async fn check_backend(&self) -> Result<HealthStatus, SubmitError> {
        Ok(HealthStatus {
            ok: true,
            service: None,
        })
    }
}

fn qr_result() -> PreregistrationResult {
    PreregistrationResult::from_body(json!({"qr_base64": "iVBORw0KGgo"})).expect("qr")
}

fn decode_error() -> SubmitError {
    SubmitError::Decode(serde_json::from_str::<serde_json::Value>("{").expect_err("bad json"))
}

fn fill(form: &mut PreregistrationForm) {
    form.visitor_name = "Luis".to_string();
    form.visit_datetime = "2024-06-02T18:30".to_string();
    form.visit_type = VisitType::Servicio;
    form.plate = "ABC123".to_string();
    form.notes = "Trae herramienta".to_string();
}

#[test]
fn starts_on_empty_form_with_submit_enabled() {
    let coordinator = Coordinator::new();
    assert_eq!(coordinator.screen(), &Screen::Form);
    assert!(coordinator.form().is_blank());
    assert_eq!(
        coordinator.view(),
        ScreenView::Form(FormView {
            title: "Preregistro",
            submit_label: "Generar QR",
            submit_enabled: true,
        })
    );
}

#[test]
fn second_submit_is_refused_while_in_flight() {
    let mut coordinator = Coordinator::new();
    let first = coordinator.begin_submit().expect("first submit");
    assert!(coordinator.is_submitting());
    assert_eq!(
        coordinator.begin_submit().expect_err("guarded"),
        SubmitRefused::InFlight
    );
    match coordinator.view() {
        ScreenView::Form(view) => assert!(!view.submit_enabled),
        other => panic!("unexpected view {other:?}"),
    }

    assert_eq!(
        coordinator.complete(first.token, Ok(qr_result())),
        Transition::Displayed
    );
    assert!(!coordinator.is_submitting());
}

#[test]
fn request_mirrors_form_at_submit_time() {
    let mut coordinator = Coordinator::new();
    fill(coordinator.form_mut());
    let pending = coordinator.begin_submit().expect("submit");

    coordinator.form_mut().visitor_name = "edited later".to_string();

    assert_eq!(pending.request.visitor_name, "Luis");
    assert_eq!(pending.request.visit_datetime, "2024-06-02T18:30");
    assert_eq!(pending.request.visit_type, VisitType::Servicio);
    assert_eq!(pending.request.plate.as_deref(), Some("ABC123"));
    assert_eq!(pending.request.notes.as_deref(), Some("Trae herramienta"));
}

#[test]
fn display_happens_once_per_successful_submission() {
    let mut coordinator = Coordinator::new();
    let pending = coordinator.begin_submit().expect("submit");

    assert_eq!(
        coordinator.complete(pending.token, Ok(qr_result())),
        Transition::Displayed
    );
    assert_eq!(
        coordinator.complete(pending.token, Ok(qr_result())),
        Transition::Stale
    );
    assert_eq!(
        coordinator.begin_submit().expect_err("display screen"),
        SubmitRefused::NotOnForm
    );
}

#[test]
fn failure_keeps_form_values_and_allows_retry() {
    let mut coordinator = Coordinator::new();
    fill(coordinator.form_mut());
    let before = coordinator.form().clone();

    let pending = coordinator.begin_submit().expect("submit");
    assert_eq!(
        coordinator.complete(pending.token, Err(decode_error())),
        Transition::StayedOnForm
    );
    assert_eq!(coordinator.screen(), &Screen::Form);
    assert_eq!(coordinator.form(), &before);

    let retry = coordinator.begin_submit().expect("retry allowed");
    assert_ne!(retry.token, pending.token);
}

#[test]
fn stale_completion_after_failure_is_ignored() {
    let mut coordinator = Coordinator::new();
    let pending = coordinator.begin_submit().expect("submit");
    coordinator.complete(pending.token, Err(SubmitError::MissingQr));

    assert_eq!(
        coordinator.complete(pending.token, Ok(qr_result())),
        Transition::Stale
    );
    assert_eq!(coordinator.screen(), &Screen::Form);
}

#[test]
fn back_resets_fields_and_is_noop_on_form() {
    let mut coordinator = Coordinator::new();
    assert!(!coordinator.back());

    fill(coordinator.form_mut());
    let pending = coordinator.begin_submit().expect("submit");
    coordinator.complete(pending.token, Ok(qr_result()));
    match coordinator.view() {
        ScreenView::Display(view) => {
            assert_eq!(view.title, "Tu QR");
            assert_eq!(view.image_src(), "data:image/png;base64,iVBORw0KGgo");
        }
        other => panic!("unexpected view {other:?}"),
    }

    assert!(coordinator.back());
    assert_eq!(coordinator.screen(), &Screen::Form);
    assert!(coordinator.form().is_blank());
}

#[tokio::test]
async fn submit_drives_api_and_transitions() {
    let api = ScriptedApi::new(vec![Err(decode_error()), Ok(qr_result())]);
    let mut coordinator = Coordinator::new();
    fill(coordinator.form_mut());

    assert_eq!(coordinator.submit(&api).await, Transition::StayedOnForm);
    assert_eq!(coordinator.submit(&api).await, Transition::Displayed);
    assert_eq!(
        coordinator.submit(&api).await,
        Transition::Refused(SubmitRefused::NotOnForm)
    );

    let seen = api.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[0].visitor_name, "Luis");
}

#[test]
fn abandon_releases_guard_only_for_matching_token() {
    let mut coordinator = Coordinator::new();
    let pending = coordinator.begin_submit().expect("submit");

    assert!(coordinator.abandon(pending.token));
    assert!(!coordinator.is_submitting());
    assert!(!coordinator.abandon(pending.token));

    let retry = coordinator.begin_submit().expect("retry allowed");
    assert!(!coordinator.abandon(pending.token));
    assert!(coordinator.is_submitting());
    assert_eq!(
        coordinator.complete(pending.token, Ok(qr_result())),
        Transition::Stale
    );
    assert_eq!(
        coordinator.complete(retry.token, Ok(qr_result())),
        Transition::Displayed
    );
}

#[test]
fn display_view_borrows_the_active_payload() {
    let mut coordinator = Coordinator::new();
    let pending = coordinator.begin_submit().expect("submit");
    coordinator.complete(pending.token, Ok(qr_result()));

    let Screen::Display(result) = coordinator.screen() else {
        panic!("expected display screen");
    };
    let ScreenView::Display(view) = coordinator.view() else {
        panic!("expected display view");
    };
    assert!(std::ptr::eq(view.qr_base64, result.qr_base64.as_str()));
    assert_eq!(view.back_label, "Regresar");
}
