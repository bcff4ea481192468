//! Customer contact details collected with a booking.

use crate::catalog::ServiceCategory;
use crate::error::CommerceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who is booking, and for which event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Date of the event, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    /// Kind of event, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<ServiceCategory>,
    /// Venue address.
    #[serde(default)]
    pub address: String,
    /// Anything else the customer wants to say.
    #[serde(default)]
    pub notes: String,
}

impl ContactDetails {
    /// Create contact details with the required fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn with_event_date(mut self, date: NaiveDate) -> Self {
        self.event_date = Some(date);
        self
    }

    pub fn with_event_type(mut self, category: ServiceCategory) -> Self {
        self.event_type = Some(category);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        missing
    }

    /// Check required fields and the email shape.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(CommerceError::Validation(format!(
                "invalid email address: {}",
                self.email.trim()
            )));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}
