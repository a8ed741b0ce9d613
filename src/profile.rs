use crate::errors::LedgerError;
use crate::models::ProfileResponse;
use serde::{Deserialize, Serialize};

/// The athlete's display name. Absent until the name prompt has been answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    #[serde(default)]
    name: Option<String>,
}

impl AthleteProfile {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn needs_name(&self) -> bool {
        self.name.is_none()
    }

    pub fn set_name(&mut self, name: &str) -> Result<&str, LedgerError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        Ok(self.name.insert(trimmed.to_string()))
    }

    pub fn to_response(&self) -> ProfileResponse {
        ProfileResponse {
            name: self.name.clone(),
            needs_name: self.needs_name(),
        }
    }
}
