//! Domain models for HealthScope

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Kind of symptom being logged
///
/// Declaration order matters: it is the iteration order used by the analysis
/// engine and the tie-break for the most common category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymptomCategory {
    Headache,
    Fatigue,
    Fever,
    Cough,
    Nausea,
    #[serde(rename = "Body Pain")]
    BodyPain,
    Dizziness,
    Other,
}

impl SymptomCategory {
    pub const ALL: [SymptomCategory; 8] = [
        Self::Headache,
        Self::Fatigue,
        Self::Fever,
        Self::Cough,
        Self::Nausea,
        Self::BodyPain,
        Self::Dizziness,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Headache => "Headache",
            Self::Fatigue => "Fatigue",
            Self::Fever => "Fever",
            Self::Cough => "Cough",
            Self::Nausea => "Nausea",
            Self::BodyPain => "Body Pain",
            Self::Dizziness => "Dizziness",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for SymptomCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "headache" => Ok(Self::Headache),
            "fatigue" => Ok(Self::Fatigue),
            "fever" => Ok(Self::Fever),
            "cough" => Ok(Self::Cough),
            "nausea" => Ok(Self::Nausea),
            "bodypain" => Ok(Self::BodyPain),
            "dizziness" => Ok(Self::Dizziness),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown symptom category: {}", s)),
        }
    }
}

impl std::fmt::Display for SymptomCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How bad a symptom was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymptomSeverity {
    Mild,
    Moderate,
    Severe,
}

impl SymptomSeverity {
    pub const ALL: [SymptomSeverity; 3] = [Self::Mild, Self::Moderate, Self::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

impl std::str::FromStr for SymptomSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

impl std::fmt::Display for SymptomSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single logged symptom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
    pub id: Uuid,
    pub category: SymptomCategory,
    pub severity: SymptomSeverity,
    #[serde(default)]
    pub notes: String,
    /// When the symptom occurred (defaults to creation time)
    pub timestamp: DateTime<Utc>,
    /// How long it lasted, stored as seconds
    #[serde(
        default,
        with = "duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Duration>,
}

impl SymptomEntry {
    /// Create an entry stamped with a fresh id and the current time
    pub fn new(category: SymptomCategory, severity: SymptomSeverity) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            severity,
            notes: String::new(),
            timestamp: Utc::now(),
            duration: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }
}

/// Parse a user-entered duration in minutes
///
/// Blank input and non-positive values mean "no duration". Anything that is
/// not a finite number is rejected.
pub fn duration_from_minutes(input: &str) -> std::result::Result<Option<Duration>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let minutes: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidDuration)?;
    if !minutes.is_finite() {
        return Err(ValidationError::InvalidDuration);
    }
    if minutes <= 0.0 {
        return Ok(None);
    }

    Duration::try_from_secs_f64(minutes * 60.0)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDuration)
}

/// The device owner's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile that has not finished onboarding yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age: None,
            email: None,
            onboarding_completed: false,
            notifications_enabled: true,
            created_at: Utc::now(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Serde adapter storing `Option<Duration>` as fractional seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_f64(d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<f64>::deserialize(deserializer)? {
            Some(secs) => Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid duration {}: {}", secs, e))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!(
            "body pain".parse::<SymptomCategory>().unwrap(),
            SymptomCategory::BodyPain
        );
        assert_eq!(
            "body_pain".parse::<SymptomCategory>().unwrap(),
            SymptomCategory::BodyPain
        );
        assert_eq!(
            "HEADACHE".parse::<SymptomCategory>().unwrap(),
            SymptomCategory::Headache
        );
        assert!("sneezing".parse::<SymptomCategory>().is_err());
        assert_eq!(SymptomCategory::BodyPain.to_string(), "Body Pain");
    }

    #[test]
    fn test_category_json_uses_display_names() {
        let json = serde_json::to_string(&SymptomCategory::BodyPain).unwrap();
        assert_eq!(json, "\"Body Pain\"");
        let back: SymptomCategory = serde_json::from_str("\"Dizziness\"").unwrap();
        assert_eq!(back, SymptomCategory::Dizziness);
    }

    #[test]
    fn test_entry_json_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 24, 9, 30, 0).unwrap();
        let entry = SymptomEntry::new(SymptomCategory::Fever, SymptomSeverity::Moderate)
            .at(ts)
            .with_notes("after lunch")
            .with_duration(Some(Duration::from_secs(1800)));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["category"], "Fever");
        assert_eq!(value["severity"], "Moderate");
        assert_eq!(value["notes"], "after lunch");
        assert_eq!(value["duration"], 1800.0);

        let back: SymptomEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_entry_without_duration_or_notes_decodes() {
        let json = r#"{
            "id": "8f14e45f-ceea-467f-a0e6-1b8e7b6c6a10",
            "category": "Cough",
            "severity": "Mild",
            "timestamp": "2026-01-24T08:00:00Z"
        }"#;
        let entry: SymptomEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.notes, "");
        assert_eq!(entry.duration, None);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let json = r#"{
            "id": "8f14e45f-ceea-467f-a0e6-1b8e7b6c6a10",
            "category": "Cough",
            "severity": "Mild",
            "timestamp": "2026-01-24T08:00:00Z",
            "duration": -5.0
        }"#;
        assert!(serde_json::from_str::<SymptomEntry>(json).is_err());
    }

    #[test]
    fn test_duration_from_minutes() {
        assert_eq!(duration_from_minutes("").unwrap(), None);
        assert_eq!(duration_from_minutes("  ").unwrap(), None);
        assert_eq!(duration_from_minutes("0").unwrap(), None);
        assert_eq!(duration_from_minutes("-3").unwrap(), None);
        assert_eq!(
            duration_from_minutes("15").unwrap(),
            Some(Duration::from_secs(900))
        );
        assert_eq!(
            duration_from_minutes("1.5").unwrap(),
            Some(Duration::from_secs(90))
        );
        assert_eq!(
            duration_from_minutes("soon"),
            Err(ValidationError::InvalidDuration)
        );
    }

    #[test]
    fn test_profile_defaults() {
        let json = r#"{
            "id": "8f14e45f-ceea-467f-a0e6-1b8e7b6c6a10",
            "name": "Sam",
            "createdAt": "2026-01-24T08:00:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.notifications_enabled);
        assert!(!profile.onboarding_completed);
        assert_eq!(profile.age, None);
    }
}
