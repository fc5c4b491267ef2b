use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::RelayError;

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// Which landing-page form produced the lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormType {
    Download,
    Explore,
    SiteVisit,
    WhatsApp,
    Enquiry,
    Webhook,
    Other(String),
}

impl FormType {
    /// Returns `None` for a blank tag.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let form_type = match trimmed.to_ascii_lowercase().as_str() {
            "download" => FormType::Download,
            "explore" => FormType::Explore,
            "sitevisit" => FormType::SiteVisit,
            "whatsapp" => FormType::WhatsApp,
            "enquiry" => FormType::Enquiry,
            "webhook" => FormType::Webhook,
            _ => FormType::Other(trimmed.to_string()),
        };
        Some(form_type)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormType::Download => "download",
            FormType::Explore => "explore",
            FormType::SiteVisit => "sitevisit",
            FormType::WhatsApp => "whatsapp",
            FormType::Enquiry => "enquiry",
            FormType::Webhook => "webhook",
            FormType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated lead. `name` and `phone` are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    form_type: FormType,
    name: String,
    email: Option<String>,
    phone: String,
    additional_notes: Option<String>,
}

impl Submission {
    pub fn new(
        form_type: FormType,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let name = name.into().trim().to_string();
        let phone = phone.into().trim().to_string();

        if name.is_empty() || phone.is_empty() {
            return Err(RelayError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
        }

        Ok(Self {
            form_type,
            name,
            email: None,
            phone,
            additional_notes: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email.into());
        self
    }

    pub fn with_additional_notes(mut self, notes: impl Into<String>) -> Self {
        self.additional_notes = non_blank(notes.into());
        self
    }

    pub fn form_type(&self) -> &FormType {
        &self.form_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn additional_notes(&self) -> Option<&str> {
        self.additional_notes.as_deref()
    }

    /// Outbound fields in sheet column order. Absent optionals are empty strings.
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("formType", self.form_type.as_str()),
            ("name", &self.name),
            ("email", self.email.as_deref().unwrap_or("")),
            ("phone", &self.phone),
            ("additionalNotes", self.additional_notes.as_deref().unwrap_or("")),
        ]
    }
}

impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Submission", 5)?;
        for (key, value) in self.pairs() {
            state.serialize_field(key, value)?;
        }
        state.end()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
