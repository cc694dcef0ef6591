use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::VisitType;

pub const PREREGISTRATION_PATH: &str = "/preregistro/crear";
pub const HEALTH_PATH: &str = "/";
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Body of `POST /preregistro/crear`. Optional fields serialize as `null`, never omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreregistrationRequest {
    #[serde(rename = "nombre_visitante")]
    pub visitor_name: String,
    /// Raw `YYYY-MM-DDTHH:MM` string from the local date/time picker.
    #[serde(rename = "fecha_visita")]
    pub visit_datetime: String,
    #[serde(rename = "tipo_visita")]
    pub visit_type: VisitType,
    #[serde(rename = "placa")]
    pub plate: Option<String>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
}

/// Backend response. Only `qr_base64` is interpreted; every other field is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreregistrationResult {
    pub qr_base64: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PreregistrationResult {
    /// Returns `None` unless `body` is an object carrying a string `qr_base64`.
    pub fn from_body(body: Value) -> Option<Self> {
        let Value::Object(mut fields) = body else {
            return None;
        };
        match fields.remove("qr_base64") {
            Some(Value::String(qr_base64)) => Some(Self { qr_base64, fields }),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Body of the backend's `GET /` health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub service: Option<String>,
}
