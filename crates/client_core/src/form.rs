use shared::{domain::VisitType, protocol::PreregistrationRequest};

/// Current values of the pre-registration form fields.
///
/// Nothing is validated here. An empty visitor name or date is submitted as an
/// empty string; blank plate and notes become `null` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreregistrationForm {
    pub visitor_name: String,
    /// Raw local picker value, e.g. `2024-05-01T10:00`.
    pub visit_datetime: String,
    pub visit_type: VisitType,
    pub plate: String,
    pub notes: String,
}

impl PreregistrationForm {
    pub fn to_request(&self) -> PreregistrationRequest {
        PreregistrationRequest {
            visitor_name: self.visitor_name.clone(),
            visit_datetime: self.visit_datetime.clone(),
            visit_type: self.visit_type,
            plate: optional(&self.plate),
            notes: optional(&self.notes),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
