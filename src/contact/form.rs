use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const SUBJECT_OPTIONS: [&str; 4] = [
    "Project proposal",
    "Collaboration opportunity",
    "Technical question",
    "Other",
];

pub const MIN_MESSAGE_LENGTH: usize = 10;
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Field name to error message, in field order. Empty means valid.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

impl ContactForm {
    /// Check every field, collecting one message per invalid field
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required".to_string());
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".to_string());
        } else if !email_pattern().is_match(&self.email) {
            errors.insert("email", "Invalid email format".to_string());
        }

        if self.subject.trim().is_empty() {
            errors.insert("subject", "Subject is required".to_string());
        }

        let length = self.message_length();
        if self.message.trim().is_empty() {
            errors.insert("message", "Message is required".to_string());
        } else if length < MIN_MESSAGE_LENGTH {
            errors.insert(
                "message",
                format!("Message must be at least {MIN_MESSAGE_LENGTH} characters"),
            );
        } else if length > MAX_MESSAGE_LENGTH {
            errors.insert(
                "message",
                format!("Message must not exceed {MAX_MESSAGE_LENGTH} characters"),
            );
        }

        errors
    }

    /// Message length in characters, not bytes
    pub fn message_length(&self) -> usize {
        self.message.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.subject.is_empty()
            && self.message.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: SUBJECT_OPTIONS[0].to_string(),
            message: "I would like to talk about a project.".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(valid().validate().is_empty());
    }

    #[test]
    fn test_blank_form_reports_every_field() {
        let errors = ContactForm::default().validate();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec!["email", "message", "name", "subject"]
        );
    }

    #[test]
    fn test_whitespace_name_is_missing() {
        let form = ContactForm {
            name: "   ".to_string(),
            ..valid()
        };
        assert_eq!(form.validate()["name"], "Name is required");
    }

    #[test]
    fn test_email_shape() {
        for bad in ["ada", "ada@example", "ada @example.com", "@example.com"] {
            let form = ContactForm {
                email: bad.to_string(),
                ..valid()
            };
            assert_eq!(form.validate()["email"], "Invalid email format", "{bad}");
        }
    }

    #[test]
    fn test_message_bounds_count_characters() {
        let short = ContactForm {
            message: "too short".to_string(),
            ..valid()
        };
        assert!(short.validate().contains_key("message"));

        // Ten accented characters are twenty bytes but only ten characters
        let exact = ContactForm {
            message: "é".repeat(MIN_MESSAGE_LENGTH),
            ..valid()
        };
        assert!(exact.validate().is_empty());

        let long = ContactForm {
            message: "a".repeat(MAX_MESSAGE_LENGTH + 1),
            ..valid()
        };
        assert!(long.validate()["message"].contains("exceed"));

        let max = ContactForm {
            message: "a".repeat(MAX_MESSAGE_LENGTH),
            ..valid()
        };
        assert!(max.validate().is_empty());
    }
}
