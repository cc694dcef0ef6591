use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of visit being pre-registered. Serialized with the backend's labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitType {
    #[default]
    Visita,
    Servicio,
}

impl VisitType {
    pub const ALL: [VisitType; 2] = [VisitType::Visita, VisitType::Servicio];

    pub fn label(self) -> &'static str {
        match self {
            VisitType::Visita => "Visita",
            VisitType::Servicio => "Servicio",
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown visit type '{0}' (expected Visita or Servicio)")]
pub struct UnknownVisitType(pub String);

impl FromStr for VisitType {
    type Err = UnknownVisitType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        VisitType::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVisitType(s.to_string()))
    }
}

/// Value sent in the `X-User-Id` header. Not an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActingUserId(pub String);

impl ActingUserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActingUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
