use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{BusinessType, Industry, LeadSubmission};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[0-9\s()]{7,20}$").expect("phone pattern is valid"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Industry,
    BusinessType,
    Name,
    City,
    Phone,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Industry,
        Field::BusinessType,
        Field::Name,
        Field::City,
        Field::Phone,
        Field::Email,
        Field::Message,
    ];

    pub fn value<'a>(&self, lead: &'a LeadSubmission) -> &'a str {
        match self {
            Field::Industry => &lead.industry,
            Field::BusinessType => &lead.business_type,
            Field::Name => &lead.name,
            Field::City => &lead.city,
            Field::Phone => &lead.phone,
            Field::Email => &lead.email,
            Field::Message => &lead.message,
        }
    }

    pub fn value_mut<'a>(&self, lead: &'a mut LeadSubmission) -> &'a mut String {
        match self {
            Field::Industry => &mut lead.industry,
            Field::BusinessType => &mut lead.business_type,
            Field::Name => &mut lead.name,
            Field::City => &mut lead.city,
            Field::Phone => &mut lead.phone,
            Field::Email => &mut lead.email,
            Field::Message => &mut lead.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

fn length_between(
    value: &str,
    min: usize,
    max: usize,
    required: &'static str,
    too_short: &'static str,
    too_long: &'static str,
) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(required);
    }
    let len = value.chars().count();
    if len < min {
        Err(too_short)
    } else if len > max {
        Err(too_long)
    } else {
        Ok(())
    }
}

pub fn validate_industry(value: &str) -> Result<Industry, &'static str> {
    Industry::from_label(value).ok_or("Select industry")
}

pub fn validate_business_type(value: &str) -> Result<BusinessType, &'static str> {
    BusinessType::from_label(value).ok_or("Select business type")
}

pub fn validate_name(value: &str) -> Result<(), &'static str> {
    length_between(value, 2, 50, "Name required", "Min 2 chars", "Max 50 chars")
}

pub fn validate_city(value: &str) -> Result<(), &'static str> {
    length_between(value, 2, 50, "City required", "Min 2 chars", "Max 50 chars")
}

pub fn validate_phone(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Phone required");
    }
    if PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err("Invalid phone number")
    }
}

pub fn validate_email(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Email required");
    }
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

pub fn validate_message(value: &str) -> Result<(), &'static str> {
    length_between(value, 10, 500, "Message required", "Min 10 chars", "Max 500 chars")
}

pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    let result = match field {
        Field::Industry => validate_industry(value).map(|_| ()),
        Field::BusinessType => validate_business_type(value).map(|_| ()),
        Field::Name => validate_name(value),
        Field::City => validate_city(value),
        Field::Phone => validate_phone(value),
        Field::Email => validate_email(value),
        Field::Message => validate_message(value),
    };
    result.map_err(|message| FieldError { field, message })
}

/// Every failing field, in form order. Empty means the lead may be sent.
pub fn validate_lead(lead: &LeadSubmission) -> Vec<FieldError> {
    Field::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, field.value(lead)).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> LeadSubmission {
        LeadSubmission {
            industry: "Technology".to_string(),
            business_type: "B2B".to_string(),
            name: "Jo Lee".to_string(),
            city: "Austin".to_string(),
            phone: "+1 512 555 0100".to_string(),
            email: "jo@example.com".to_string(),
            message: "Need a new website for our startup".to_string(),
        }
    }

    #[test]
    fn test_valid_lead_has_no_errors() {
        assert!(validate_lead(&lead()).is_empty());
    }

    #[test]
    fn test_empty_lead_reports_every_field() {
        let errors = validate_lead(&LeadSubmission::default());
        let messages: Vec<_> = errors.iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "Select industry",
                "Select business type",
                "Name required",
                "City required",
                "Phone required",
                "Email required",
                "Message required",
            ]
        );
    }

    #[test]
    fn test_name_and_city_lengths() {
        assert_eq!(validate_name("J"), Err("Min 2 chars"));
        assert_eq!(validate_name("Jo"), Ok(()));
        assert_eq!(validate_name(&"a".repeat(50)), Ok(()));
        assert_eq!(validate_name(&"a".repeat(51)), Err("Max 50 chars"));
        assert_eq!(validate_city("   "), Err("City required"));
        // counted in characters, not bytes
        assert_eq!(validate_city("Zürich"), Ok(()));
        assert_eq!(validate_city(&"é".repeat(50)), Ok(()));
    }

    #[test]
    fn test_phone_pattern() {
        assert_eq!(validate_phone("+1 512 555 0100"), Ok(()));
        assert_eq!(validate_phone("(512) 5550100"), Ok(()));
        assert_eq!(validate_phone("5550100"), Ok(()));
        assert_eq!(validate_phone("555010"), Err("Invalid phone number"));
        assert_eq!(validate_phone("512-555-0100"), Err("Invalid phone number"));
        assert_eq!(validate_phone("++15125550100"), Err("Invalid phone number"));
        assert_eq!(validate_phone(&"1".repeat(21)), Err("Invalid phone number"));
    }

    #[test]
    fn test_email_pattern() {
        assert_eq!(validate_email("jo@example.com"), Ok(()));
        assert_eq!(validate_email("JO.LEE+site@Mail.Example.IO"), Ok(()));
        assert_eq!(validate_email("jo@example"), Err("Invalid email format"));
        assert_eq!(validate_email("jo example.com"), Err("Invalid email format"));
        assert_eq!(validate_email("jo@example.c"), Err("Invalid email format"));
    }

    #[test]
    fn test_message_lengths() {
        assert_eq!(validate_message("too short"), Err("Min 10 chars"));
        assert_eq!(validate_message("long enough"), Ok(()));
        assert_eq!(validate_message(&"x".repeat(500)), Ok(()));
        assert_eq!(validate_message(&"x".repeat(501)), Err("Max 500 chars"));
    }

    #[test]
    fn test_option_sets() {
        assert_eq!(validate_industry("E-commerce"), Ok(Industry::ECommerce));
        assert_eq!(validate_industry("Crypto"), Err("Select industry"));
        assert_eq!(validate_business_type("Both"), Ok(BusinessType::Both));
        assert_eq!(validate_business_type(""), Err("Select business type"));
    }

    #[test]
    fn test_field_error_display() {
        let err = validate_field(Field::Email, "nope").unwrap_err();
        assert_eq!(err.field, Field::Email);
        assert_eq!(err.to_string(), "Invalid email format");
    }
}
