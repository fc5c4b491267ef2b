use serde_json::Value;

use crate::error::RelayError;
use crate::models::submission::MISSING_REQUIRED_FIELDS;
use crate::models::{FormType, Submission};

use super::parser::RawFields;

/// Build a [`Submission`] from loosely-typed request fields.
///
/// Only the five known attributes are read; anything else in the body is
/// dropped. `default_form_type` stands in for a missing `formType` when the
/// deployment allows it.
pub fn extract(raw: &RawFields, default_form_type: Option<&FormType>) -> Result<Submission, RelayError> {
    let form_type = text_field(raw, "formType")
        .and_then(|t| FormType::parse(&t))
        .or_else(|| default_form_type.cloned());

    let (Some(form_type), Some(name), Some(phone)) =
        (form_type, text_field(raw, "name"), text_field(raw, "phone"))
    else {
        return Err(RelayError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
    };

    let mut submission = Submission::new(form_type, name, phone)?;
    if let Some(email) = text_field(raw, "email") {
        submission = submission.with_email(email);
    }
    if let Some(notes) = text_field(raw, "additionalNotes") {
        submission = submission.with_additional_notes(notes);
    }

    Ok(submission)
}

/// Strings are taken as-is, numbers and booleans by their text form.
/// Null, blank, and structured values count as absent.
fn text_field(raw: &RawFields, key: &str) -> Option<String> {
    let text = match raw.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() { None } else { Some(text) }
}
