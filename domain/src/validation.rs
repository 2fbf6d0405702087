//! # Form Validation
//!
//! Field-level and form-level checks for the page's forms. Errors are values
//! rendered inline next to the offending field; they are never propagated.
//!
//! ## Rules
//!
//! - Required fields must be non-empty after trimming
//! - Email fields must look like `local@domain.tld`
//! - Phone fields may contain spaces, dashes and parentheses; what remains
//!   must be an optional `+` followed by up to 16 digits not starting with 0
//! - Date fields must be ISO dates no earlier than today
//! - Number fields must be positive whole numbers

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use shared::{ModalId, NotificationKind};
use std::collections::BTreeMap;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern is valid")
});

static PHONE_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\-()]").expect("separator pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Tel,
    Date,
    Number,
    Select,
    TextArea,
    Radio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// DOM id / form key
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: true }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    InvalidPhone,
    InvalidDate,
    PastDate,
    InvalidNumber,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Required => "This field is required",
            FieldError::InvalidEmail => "Please enter a valid email address",
            FieldError::InvalidPhone => "Please enter a valid phone number",
            FieldError::InvalidDate => "Please enter a valid date",
            FieldError::PastDate => "Date cannot be in the past",
            FieldError::InvalidNumber => "Please enter a valid number",
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    let digits = PHONE_SEPARATORS.replace_all(value.trim(), "");
    PHONE_PATTERN.is_match(&digits)
}

/// Check one field. Empty optional fields always pass.
pub fn validate_field(spec: &FieldSpec, value: &str, today: NaiveDate) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return spec.required.then_some(FieldError::Required);
    }

    match spec.kind {
        FieldKind::Email if !is_valid_email(value) => Some(FieldError::InvalidEmail),
        FieldKind::Tel if !is_valid_phone(value) => Some(FieldError::InvalidPhone),
        FieldKind::Date => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) if date < today => Some(FieldError::PastDate),
            Ok(_) => None,
            Err(_) => Some(FieldError::InvalidDate),
        },
        FieldKind::Number => match value.parse::<u32>() {
            Ok(n) if n > 0 => None,
            _ => Some(FieldError::InvalidNumber),
        },
        _ => None,
    }
}

/// Forms present on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormId {
    Login,
    Signup,
    Donation,
    Request,
    Contact,
}

impl FormId {
    /// Overlay that contains the form, if any
    pub fn modal(&self) -> Option<ModalId> {
        match self {
            FormId::Login => Some(ModalId::Login),
            FormId::Signup => Some(ModalId::Signup),
            FormId::Donation => Some(ModalId::Donation),
            FormId::Request => Some(ModalId::Request),
            FormId::Contact => None,
        }
    }

    pub fn for_modal(modal: ModalId) -> Option<FormId> {
        [FormId::Login, FormId::Signup, FormId::Donation, FormId::Request]
            .into_iter()
            .find(|form| form.modal() == Some(modal))
    }
}

/// Static shape of a form: which fields it contains
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
    pub id: FormId,
    pub fields: Vec<FieldSpec>,
}

impl FormLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str, kind: FieldKind) -> bool {
        self.field(name).is_some_and(|f| f.kind == kind)
    }
}

/// Layouts of every form the page serves
pub fn standard_layouts() -> Vec<FormLayout> {
    use FieldKind::*;
    vec![
        FormLayout {
            id: FormId::Login,
            fields: vec![
                FieldSpec::required("loginEmail", "Email", Email),
                FieldSpec::required("loginPassword", "Password", Password),
            ],
        },
        FormLayout {
            id: FormId::Signup,
            fields: vec![
                FieldSpec::required("signupName", "Full Name", Text),
                FieldSpec::required("signupEmail", "Email", Email),
                FieldSpec::required("signupPassword", "Password", Password),
                FieldSpec::optional("role", "I am a", Radio),
            ],
        },
        FormLayout {
            id: FormId::Donation,
            fields: vec![
                FieldSpec::required("foodType", "Food Type", Select),
                FieldSpec::required("quantity", "Quantity", Text),
                FieldSpec::required("expiryDate", "Expiry Date", Date),
                FieldSpec::required("pickupLocation", "Pickup Location", Text),
                FieldSpec::optional("description", "Description", TextArea),
                FieldSpec::required("contactPhone", "Contact Phone", Tel),
            ],
        },
        FormLayout {
            id: FormId::Request,
            fields: vec![
                FieldSpec::required("orgName", "Organization Name", Text),
                FieldSpec::required("orgType", "Organization Type", Select),
                FieldSpec::required("peopleCount", "Number of People", Number),
                FieldSpec::required("foodNeeds", "Food Needs", TextArea),
                FieldSpec::required("deliveryAddress", "Delivery Address", Text),
                FieldSpec::required("urgent", "Urgency", Select),
                FieldSpec::required("orgContact", "Contact Person", Text),
            ],
        },
        FormLayout {
            id: FormId::Contact,
            fields: vec![
                FieldSpec::required("contactName", "Name", Text),
                FieldSpec::required("contactEmail", "Email", Email),
                FieldSpec::required("contactMessage", "Message", TextArea),
            ],
        },
    ]
}

/// Current field values keyed by field name
pub type FormValues = BTreeMap<String, String>;

/// Message shown at the top of a form
#[derive(Debug, Clone, PartialEq)]
pub struct FormMessage {
    pub text: String,
    pub kind: NotificationKind,
}

/// Live state of one form
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub layout: FormLayout,
    pub values: FormValues,
    pub errors: BTreeMap<String, FieldError>,
    pub message: Option<FormMessage>,
}

impl FormState {
    pub fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            values: FormValues::new(),
            errors: BTreeMap::new(),
            message: None,
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Re-check one field (on blur); unknown fields are ignored
    pub fn validate_field(&mut self, name: &str, today: NaiveDate) -> bool {
        let Some(spec) = self.layout.field(name).cloned() else {
            return true;
        };
        match validate_field(&spec, self.value(name), today) {
            Some(error) => {
                self.errors.insert(name.to_string(), error);
                false
            }
            None => {
                self.errors.remove(name);
                true
            }
        }
    }

    /// Check every field, recording all errors
    pub fn validate(&mut self, today: NaiveDate) -> bool {
        let names: Vec<&'static str> = self.layout.fields.iter().map(|f| f.name).collect();
        let mut valid = true;
        for name in names {
            valid &= self.validate_field(name, today);
        }
        valid
    }

    /// Replace any message at the top of the form
    pub fn show_message(&mut self, text: impl Into<String>, kind: NotificationKind) {
        self.message = Some(FormMessage { text: text.into(), kind });
    }

    /// Clear values, inline errors and messages
    pub fn reset(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.message = None;
    }
}
