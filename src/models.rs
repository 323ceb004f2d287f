use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::errors::{PortalError, PortalResult};

/// Pairs a record key with the column label shown for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
}

impl FieldDescriptor {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// One displayable row: a flat mapping from field key to display text.
///
/// Records carry no identity of their own; tables address them by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for Record {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Number(n) => n.to_string(),
                    other => other.to_string(),
                };
                Some((key, text))
            })
            .collect();
        Record(values)
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

/// Severity tier for case priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

/// APIs an NGO opts into during onboarding
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiSelection {
    pub donor: bool,
    pub recipients: bool,
    pub volunteer: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub ngo_name: String,
    pub email: String,
    pub description: String,
    pub website: String,
    pub apis: ApiSelection,
}

impl OnboardingRequest {
    pub fn validate(&self) -> PortalResult<()> {
        require("NGO name", &self.ngo_name)?;
        require_email(&self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn parse(method: &str) -> PortalResult<Self> {
        match method.trim().to_lowercase().as_str() {
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(PortalError::InvalidInput(format!(
                "Unsupported payment method: {}. Supported methods: card, upi",
                other
            ))),
        }
    }
}

/// Why a donation is being made, with the detail each purpose asks for
#[derive(Debug, Clone, PartialEq)]
pub enum DonationPurpose {
    General,
    Birthday(NaiveDate),
    Anniversary(NaiveDate),
    Memory(String),
    Honor(String),
    Other(String),
}

impl DonationPurpose {
    pub fn parse(kind: &str, details: Option<&str>) -> PortalResult<Self> {
        let details = details.map(str::trim).filter(|d| !d.is_empty());
        let kind = kind.trim().to_lowercase();

        let need = |what: &str| {
            details.map(str::to_string).ok_or_else(|| {
                PortalError::InvalidInput(format!("Donation purpose '{}' requires {}", kind, what))
            })
        };
        let need_date = |what: &str| -> PortalResult<NaiveDate> {
            let raw = need(what)?;
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                PortalError::InvalidInput(format!("Invalid date '{}': {}", raw, e))
            })
        };

        match kind.as_str() {
            "general" => Ok(DonationPurpose::General),
            "birthday" => Ok(DonationPurpose::Birthday(need_date("a date (YYYY-MM-DD)")?)),
            "anniversary" => Ok(DonationPurpose::Anniversary(need_date("a date (YYYY-MM-DD)")?)),
            "memory" => Ok(DonationPurpose::Memory(need("the name of the person")?)),
            "honor" => Ok(DonationPurpose::Honor(need("the name of the person")?)),
            "other" => Ok(DonationPurpose::Other(need("a description")?)),
            other => Err(PortalError::InvalidInput(format!(
                "Unsupported donation purpose: {}. Supported purposes: general, birthday, anniversary, memory, honor, other",
                other
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DonationPurpose::General => "general",
            DonationPurpose::Birthday(_) => "birthday",
            DonationPurpose::Anniversary(_) => "anniversary",
            DonationPurpose::Memory(_) => "memory",
            DonationPurpose::Honor(_) => "honor",
            DonationPurpose::Other(_) => "other",
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            DonationPurpose::General => None,
            DonationPurpose::Birthday(date) | DonationPurpose::Anniversary(date) => {
                Some(date.format("%Y-%m-%d").to_string())
            }
            DonationPurpose::Memory(text)
            | DonationPurpose::Honor(text)
            | DonationPurpose::Other(text) => Some(text.clone()),
        }
    }
}

impl Serialize for DonationPurpose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct PurposeInfo<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
            details: Option<String>,
        }

        PurposeInfo {
            kind: self.kind(),
            details: self.details(),
        }
        .serialize(serializer)
    }
}

/// Preset amounts offered by the donation form
pub const PRESET_AMOUNTS: [&str; 3] = ["100", "500", "1000"];

/// Accepts a preset or custom amount; must be a positive finite number
pub fn parse_amount(raw: &str) -> PortalResult<String> {
    let trimmed = raw.trim().trim_start_matches('$').replace(',', "");
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(trimmed),
        _ => Err(PortalError::InvalidInput(format!(
            "Invalid donation amount: '{}'",
            raw
        ))),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub amount: String,
    pub payment_method: PaymentMethod,
    pub purpose: DonationPurpose,
}

impl DonationRequest {
    pub fn validate(&self) -> PortalResult<()> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        require_email(&self.email)?;
        parse_amount(&self.amount).map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistanceType {
    Surgery,
    Treatment,
    Medication,
    Other,
}

impl AssistanceType {
    pub fn parse(kind: &str) -> PortalResult<Self> {
        match kind.trim().to_lowercase().as_str() {
            "surgery" => Ok(AssistanceType::Surgery),
            "treatment" | "medical-treatment" => Ok(AssistanceType::Treatment),
            "medication" => Ok(AssistanceType::Medication),
            "other" => Ok(AssistanceType::Other),
            other => Err(PortalError::InvalidInput(format!(
                "Unsupported assistance type: {}. Supported types: surgery, treatment, medication, other",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssistanceType::Surgery => "surgery",
            AssistanceType::Treatment => "treatment",
            AssistanceType::Medication => "medication",
            AssistanceType::Other => "other",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AssistanceType::Surgery => "Surgery",
            AssistanceType::Treatment => "Medical Treatment",
            AssistanceType::Medication => "Medication",
            AssistanceType::Other => "Other Assistance",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistanceRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub medical_condition: String,
    pub assistance_required: AssistanceType,
}

impl AssistanceRequest {
    pub fn validate(&self) -> PortalResult<()> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        require_email(&self.email)?;
        require("medical condition", &self.medical_condition)
    }

    /// Text parts of the multipart form, named as the portal expects them
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("firstName", self.first_name.clone()),
            ("lastName", self.last_name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("medicalCondition", self.medical_condition.clone()),
            ("assistanceRequired", self.assistance_required.as_str().to_string()),
        ]
    }
}

/// A document template registered on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateEntry {
    pub name: String,
    pub description: String,
    pub file_name: String,
    pub upload_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiKeyEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoint {
    pub name: String,
    pub endpoint: String,
}

fn require(what: &str, value: &str) -> PortalResult<()> {
    if value.trim().is_empty() {
        Err(PortalError::InvalidInput(format!("{} is required", what)))
    } else {
        Ok(())
    }
}

fn require_email(email: &str) -> PortalResult<()> {
    require("email", email)?;
    if !email.contains('@') {
        return Err(PortalError::InvalidInput(format!("Invalid email address: {}", email)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_json_converts_scalars() {
        let record: Record = serde_json::from_value(json!({
            "name": "Maria Garcia",
            "amount": 250,
            "verified": true,
            "notes": null
        }))
        .unwrap();

        assert_eq!(record.get("name"), Some("Maria Garcia"));
        assert_eq!(record.get("amount"), Some("250"));
        assert_eq!(record.get("verified"), Some("true"));
        assert_eq!(record.get("notes"), None);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record::new().with("name", "A");
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({ "name": "A" }));
    }

    #[test]
    fn test_donation_payload_shape() {
        let request = DonationRequest {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "ana@example.org".to_string(),
            phone: String::new(),
            amount: parse_amount("$1,000").unwrap(),
            payment_method: PaymentMethod::parse("UPI").unwrap(),
            purpose: DonationPurpose::parse("memory", Some("Joao Silva")).unwrap(),
        };
        request.validate().unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["firstName"], "Ana");
        assert_eq!(value["amount"], "1000");
        assert_eq!(value["paymentMethod"], "upi");
        assert_eq!(value["purpose"], json!({ "type": "memory", "details": "Joao Silva" }));
    }

    #[test]
    fn test_general_purpose_has_null_details() {
        let purpose = DonationPurpose::parse("General", None).unwrap();
        assert_eq!(
            serde_json::to_value(&purpose).unwrap(),
            json!({ "type": "general", "details": null })
        );
    }

    #[test]
    fn test_purpose_requires_details() {
        assert!(DonationPurpose::parse("birthday", None).is_err());
        assert!(DonationPurpose::parse("birthday", Some("next week")).is_err());
        assert!(DonationPurpose::parse("other", Some("  ")).is_err());
        assert!(DonationPurpose::parse("lottery", None).is_err());

        let birthday = DonationPurpose::parse("birthday", Some("2024-05-01")).unwrap();
        assert_eq!(birthday.details().as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_amount_validation() {
        for preset in PRESET_AMOUNTS {
            assert!(parse_amount(preset).is_ok());
        }
        assert_eq!(parse_amount(" 42.50 ").unwrap(), "42.50");
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("lots").is_err());
    }

    #[test]
    fn test_onboarding_payload_shape() {
        let request = OnboardingRequest {
            ngo_name: "Go Good".to_string(),
            email: "hello@gogood.org".to_string(),
            description: "Medical care".to_string(),
            website: "https://gogood.org".to_string(),
            apis: ApiSelection { donor: true, recipients: false, volunteer: true },
        };
        request.validate().unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["ngoName"], "Go Good");
        assert_eq!(value["apis"], json!({ "donor": true, "recipients": false, "volunteer": true }));
    }

    #[test]
    fn test_assistance_request_fields() {
        let request = AssistanceRequest {
            first_name: "Robert".to_string(),
            last_name: "Chen".to_string(),
            email: "robert.c@email.com".to_string(),
            phone: "+1 (555) 234-5678".to_string(),
            medical_condition: "Fractured hip".to_string(),
            assistance_required: AssistanceType::parse("Surgery").unwrap(),
        };
        request.validate().unwrap();

        let fields = request.form_fields();
        assert!(fields.contains(&("assistanceRequired", "surgery".to_string())));
        assert!(fields.contains(&("medicalCondition", "Fractured hip".to_string())));
        assert!(AssistanceType::parse("massage").is_err());
    }

    #[test]
    fn test_email_validation() {
        let mut request = OnboardingRequest {
            ngo_name: "Go Good".to_string(),
            email: "not-an-email".to_string(),
            description: String::new(),
            website: String::new(),
            apis: ApiSelection::default(),
        };
        assert!(request.validate().is_err());
        request.email = "ops@gogood.org".to_string();
        assert!(request.validate().is_ok());
    }
}
