use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Education,
    ECommerce,
    RealEstate,
    Manufacturing,
    Entertainment,
    NonProfit,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 10] = [
        Industry::Technology,
        Industry::Healthcare,
        Industry::Finance,
        Industry::Education,
        Industry::ECommerce,
        Industry::RealEstate,
        Industry::Manufacturing,
        Industry::Entertainment,
        Industry::NonProfit,
        Industry::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Education => "Education",
            Industry::ECommerce => "E-commerce",
            Industry::RealEstate => "Real Estate",
            Industry::Manufacturing => "Manufacturing",
            Industry::Entertainment => "Entertainment",
            Industry::NonProfit => "Non-profit",
            Industry::Other => "Other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.label() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessType {
    B2b,
    B2c,
    Both,
}

impl BusinessType {
    pub const ALL: [BusinessType; 3] = [BusinessType::B2b, BusinessType::B2c, BusinessType::Both];

    pub fn label(&self) -> &'static str {
        match self {
            BusinessType::B2b => "B2B",
            BusinessType::B2c => "B2C",
            BusinessType::Both => "Both",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == s)
    }
}

/// A contact-form submission as it travels over the wire. Fields stay plain
/// strings so the intake endpoint can report every missing one at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
}

/// Accepts any JSON value for a form field so one odd field cannot sink the
/// whole submission. Numbers and `true` keep their text; `null`, `false`,
/// zero and structured values read as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    })
}

impl LeadSubmission {
    /// Wire names of the fields that are absent or blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("industry", &self.industry),
            ("businessType", &self.business_type),
            ("name", &self.name),
            ("city", &self.city),
            ("phone", &self.phone),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_labels_round_trip() {
        for industry in Industry::ALL {
            assert_eq!(Industry::from_label(industry.label()), Some(industry));
        }
        assert_eq!(Industry::from_label("Real Estate"), Some(Industry::RealEstate));
        assert_eq!(Industry::from_label("Mining"), None);
    }

    #[test]
    fn test_business_type_labels() {
        assert_eq!(BusinessType::from_label("B2B"), Some(BusinessType::B2b));
        assert_eq!(BusinessType::from_label("Both"), Some(BusinessType::Both));
        assert_eq!(BusinessType::from_label("b2b"), None);
    }

    #[test]
    fn test_deserialize_camel_case_with_missing_fields() {
        let lead: LeadSubmission =
            serde_json::from_str(r#"{"businessType":"B2C","name":"Jo"}"#).unwrap();
        assert_eq!(lead.business_type, "B2C");
        assert_eq!(lead.name, "Jo");
        assert_eq!(
            lead.missing_fields(),
            vec!["industry", "city", "phone", "email", "message"]
        );
    }

    #[test]
    fn test_null_field_is_the_only_missing_one() {
        let lead: LeadSubmission = serde_json::from_str(
            r#"{"industry":"Technology","businessType":"B2B","name":"Jo Lee","city":null,
                "phone":"+1 512 555 0100","email":"jo@example.com","message":"Need a new website"}"#,
        )
        .unwrap();
        assert_eq!(lead.city, "");
        assert_eq!(lead.missing_fields(), vec!["city"]);
    }

    #[test]
    fn test_non_string_values_keep_their_text() {
        let lead: LeadSubmission = serde_json::from_str(
            r#"{"phone":5125550100,"name":true,"city":false,"message":0,"email":{"a":1},"industry":["x"]}"#,
        )
        .unwrap();
        assert_eq!(lead.phone, "5125550100");
        assert_eq!(lead.name, "true");
        assert_eq!(
            lead.missing_fields(),
            vec!["industry", "businessType", "city", "email", "message"]
        );
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let lead = LeadSubmission {
            industry: "Technology".to_string(),
            business_type: "B2B".to_string(),
            name: "   ".to_string(),
            city: "Austin".to_string(),
            phone: "+1 512 555 0100".to_string(),
            email: "jo@example.com".to_string(),
            message: "Need a new website".to_string(),
        };
        assert_eq!(lead.missing_fields(), vec!["name"]);
    }
}
