//! Compose form and its validation.

use platform_host::OutgoingEmail;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compose form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComposeField {
    /// Recipient.
    To,
    /// Subject line.
    Subject,
    /// Message body.
    Body,
}

impl ComposeField {
    /// Form label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::To => "To",
            Self::Subject => "Subject",
            Self::Body => "Message",
        }
    }
}

/// Local compose failures surfaced as inline form feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ComposeError {
    /// A required field is empty after trimming.
    #[error("{} is required", .0.label())]
    EmptyField(ComposeField),
}

/// Compose modal contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeForm {
    /// Recipient text.
    pub to: String,
    /// Subject text.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Last validation failure, cleared on edit.
    pub error: Option<ComposeError>,
}

impl ComposeForm {
    /// Replaces one field.
    pub fn set(&mut self, field: ComposeField, value: String) {
        match field {
            ComposeField::To => self.to = value,
            ComposeField::Subject => self.subject = value,
            ComposeField::Body => self.body = value,
        }
        self.error = None;
    }

    /// Returns the field's current text.
    pub fn get(&self, field: ComposeField) -> &str {
        match field {
            ComposeField::To => &self.to,
            ComposeField::Subject => &self.subject,
            ComposeField::Body => &self.body,
        }
    }

    /// Validates every field in form order and builds the outgoing message.
    pub fn validate(&self) -> Result<OutgoingEmail, ComposeError> {
        for field in [ComposeField::To, ComposeField::Subject, ComposeField::Body] {
            if self.get(field).trim().is_empty() {
                return Err(ComposeError::EmptyField(field));
            }
        }
        Ok(OutgoingEmail {
            to: self.to.trim().to_string(),
            subject: self.subject.trim().to_string(),
            body: self.body.trim_end().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn whitespace_only_fields_are_empty() {
        let form = ComposeForm {
            to: "harry@hogwarts.edu".to_string(),
            subject: "   ".to_string(),
            body: "hi".to_string(),
            error: None,
        };
        let err = form.validate().expect_err("blank subject");
        assert_eq!(err, ComposeError::EmptyField(ComposeField::Subject));
        assert_eq!(err.to_string(), "Subject is required");
    }

    #[test]
    fn editing_clears_the_error() {
        let mut form = ComposeForm {
            error: Some(ComposeError::EmptyField(ComposeField::To)),
            ..ComposeForm::default()
        };
        form.set(ComposeField::To, "ron@hogwarts.edu".to_string());
        assert_eq!(form.error, None);
    }
}
