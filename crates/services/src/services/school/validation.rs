use std::fmt;

use db::models::school::SchoolFields;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

const CONTACT_DIGITS: usize = 10;

/// Raw school fields as submitted by a client. Nothing here is trusted until
/// it has gone through [`validate_school_form`].
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct SchoolForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact: Option<String>,
    pub email_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|error| error.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn required(
    errors: &mut ValidationErrors,
    value: Option<&str>,
    field: &str,
    message: &str,
) -> Option<String> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

pub fn is_valid_contact(contact: &str) -> bool {
    contact.len() == CONTACT_DIGITS && contact.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks every field and reports all failures at once.
pub fn validate_school_form(form: &SchoolForm) -> Result<SchoolFields, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required(&mut errors, form.name.as_deref(), "name", "School name is required");
    let address = required(&mut errors, form.address.as_deref(), "address", "Address is required");
    let city = required(&mut errors, form.city.as_deref(), "city", "City is required");
    let state = required(&mut errors, form.state.as_deref(), "state", "State is required");

    let contact = required(&mut errors, form.contact.as_deref(), "contact", "Contact is required")
        .filter(|contact| {
            let valid = is_valid_contact(contact);
            if !valid {
                errors.push("contact", "Contact must be a 10-digit number");
            }
            valid
        });

    let email_id = required(&mut errors, form.email_id.as_deref(), "email_id", "Email is required")
        .filter(|email| {
            let valid = is_valid_email(email);
            if !valid {
                errors.push("email_id", "Invalid email format");
            }
            valid
        });

    match (name, address, city, state, contact, email_id) {
        (Some(name), Some(address), Some(city), Some(state), Some(contact), Some(email_id))
            if errors.is_empty() =>
        {
            Ok(SchoolFields {
                name,
                address,
                city,
                state,
                contact,
                email_id,
            })
        }
        _ => Err(errors),
    }
}

/// Like [`validate_school_form`], but a new school also needs an image.
pub fn validate_new_school<T>(
    form: &SchoolForm,
    image: Option<T>,
) -> Result<(SchoolFields, T), ValidationErrors> {
    match (validate_school_form(form), image) {
        (Ok(fields), Some(image)) => Ok((fields, image)),
        (Ok(_), None) => {
            let mut errors = ValidationErrors::default();
            errors.push("image", "School image is required");
            Err(errors)
        }
        (Err(mut errors), image) => {
            if image.is_none() {
                errors.push("image", "School image is required");
            }
            Err(errors)
        }
    }
}
