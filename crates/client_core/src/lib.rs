use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::{
    domain::ActingUserId,
    error::describe_error_body,
    protocol::{
        HealthStatus, PreregistrationRequest, PreregistrationResult, HEALTH_PATH,
        PREREGISTRATION_PATH, USER_ID_HEADER,
    },
};
use tracing::{debug, info};

pub mod config;
pub mod coordinator;
pub mod error;
pub mod form;
pub mod qr;

pub use config::{load_settings, Settings, SettingsOverrides};
pub use coordinator::{
    Coordinator, DisplayView, FormView, PendingSubmission, Screen, ScreenView, SubmissionToken,
    SubmitRefused, Transition,
};
pub use error::{ConfigError, QrError, SubmitError};
pub use form::PreregistrationForm;

/// Backend operations used by the front-ends.
#[async_trait]
pub trait PreregistrationApi: Send + Sync {
    /// Sends one pre-registration. No retries.
    async fn create_preregistration(
        &self,
        request: &PreregistrationRequest,
    ) -> Result<PreregistrationResult, SubmitError>;

    async fn check_backend(&self) -> Result<HealthStatus, SubmitError>;
}

pub struct PreregistrationClient {
    http: Client,
    settings: Settings,
}

impl PreregistrationClient {
    pub fn new(settings: &Settings) -> Result<Self, SubmitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            settings: settings.clone(),
        })
    }

    fn acting_user_id(&self) -> &ActingUserId {
        &self.settings.acting_user_id
    }
}

async fn read_json_body(response: reqwest::Response) -> Result<Value, SubmitError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SubmitError::Rejected {
            status: status.as_u16(),
            detail: describe_status(status, &body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let detail = describe_error_body(body);
    if status == StatusCode::UNAUTHORIZED {
        format!("{detail} (check the configured acting user id)")
    } else {
        detail
    }
}

#[async_trait]
impl PreregistrationApi for PreregistrationClient {
    async fn create_preregistration(
        &self,
        request: &PreregistrationRequest,
    ) -> Result<PreregistrationResult, SubmitError> {
        let url = self.settings.url_for(PREREGISTRATION_PATH);
        debug!(%url, user_id = %self.acting_user_id(), "posting preregistration");

        let response = self
            .http
            .post(&url)
            .header(USER_ID_HEADER, self.acting_user_id().as_str())
            .json(request)
            .send()
            .await?;
        let body = read_json_body(response).await?;
        debug!(response = %body, "backend response");

        let result = PreregistrationResult::from_body(body).ok_or(SubmitError::MissingQr)?;
        info!(
            qr_len = result.qr_base64.len(),
            extra_fields = result.fields.len(),
            "received preregistration qr"
        );
        Ok(result)
    }

    async fn check_backend(&self) -> Result<HealthStatus, SubmitError> {
        let response = self.http.get(self.settings.url_for(HEALTH_PATH)).send().await?;
        let body = read_json_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
