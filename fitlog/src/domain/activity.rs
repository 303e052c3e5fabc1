use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An activity log entry as the server stores it. `id` is server-assigned
/// and absent until the entry has been created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub duration_minutes: u32,
    pub date: String,
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Activity {
    pub fn new(
        activity_type: impl Into<String>,
        duration_minutes: u32,
        date: impl Into<String>,
        intensity: Intensity,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: None,
            activity_type: activity_type.into(),
            duration_minutes,
            date: date.into(),
            intensity,
            notes,
        }
    }

    /// The date limited to its `YYYY-MM-DD` prefix. The server may append a
    /// time-of-day suffix; only the first ten characters are shown. The
    /// stored value is never truncated.
    pub fn date_display(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }

    /// The date parsed as a calendar day, ignoring any time suffix.
    pub fn parsed_date(&self) -> Result<chrono::NaiveDate, chrono::ParseError> {
        chrono::NaiveDate::parse_from_str(self.date_display(), "%Y-%m-%d")
    }
}

/// PATCH body for `activities/{id}`. Fields left `None` are not sent.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ActivityPatch {
    /// True when no field is set, i.e. the PATCH body would be `{}`.
    pub fn is_empty(&self) -> bool {
        self.activity_type.is_none()
            && self.duration_minutes.is_none()
            && self.date.is_none()
            && self.intensity.is_none()
            && self.notes.is_none()
    }
}

impl From<Activity> for ActivityPatch {
    fn from(activity: Activity) -> Self {
        Self {
            activity_type: Some(activity.activity_type),
            duration_minutes: Some(activity.duration_minutes),
            date: Some(activity.date),
            intensity: Some(activity.intensity),
            notes: activity.notes,
        }
    }
}

/// Intensity of an activity. The server stores the literal values below;
/// decoding accepts them in any casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Intensity {
    Baja,
    Media,
    Alta,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Baja => "Baja",
            Intensity::Media => "Media",
            Intensity::Alta => "Alta",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("'{0}' is not an intensity: expected Baja, Media or Alta")]
pub struct ParseIntensityError(String);

impl FromStr for Intensity {
    type Err = ParseIntensityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baja" => Ok(Intensity::Baja),
            "media" => Ok(Intensity::Media),
            "alta" => Ok(Intensity::Alta),
            _ => Err(ParseIntensityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Intensity {
    type Error = ParseIntensityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Intensity> for String {
    fn from(intensity: Intensity) -> Self {
        intensity.as_str().to_string()
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> Activity {
        Activity::new("Running", 30, "2024-01-01", Intensity::Alta, None)
    }

    #[test]
    fn serializes_to_the_wire_shape() {
        let json = serde_json::to_value(running()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "Running",
                "durationMinutes": 30,
                "date": "2024-01-01",
                "intensity": "Alta",
            })
        );
    }

    #[test]
    fn id_is_sent_once_assigned() {
        let mut activity = running();
        activity.id = Some(7);
        let json = serde_json::to_value(activity).unwrap();
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn deserializes_without_id_or_notes() {
        let activity: Activity = serde_json::from_str(
            r#"{"type": "Yoga", "durationMinutes": 45, "date": "2024-02-10", "intensity": "media"}"#,
        )
        .unwrap();
        assert_eq!(activity.id, None);
        assert_eq!(activity.notes, None);
        assert_eq!(activity.intensity, Intensity::Media);
    }

    #[test]
    fn unknown_intensity_fails_decode() {
        let result = serde_json::from_str::<Activity>(
            r#"{"type": "Yoga", "durationMinutes": 45, "date": "2024-02-10", "intensity": "extrema"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn intensity_parses_case_insensitively() {
        assert_eq!("ALTA".parse::<Intensity>().unwrap(), Intensity::Alta);
        assert_eq!("baja".parse::<Intensity>().unwrap(), Intensity::Baja);
        assert_eq!("Media".parse::<Intensity>().unwrap(), Intensity::Media);
    }

    #[test]
    fn intensity_round_trips_canonical_literals() {
        for intensity in [Intensity::Baja, Intensity::Media, Intensity::Alta] {
            assert_eq!(intensity.to_string().parse::<Intensity>().unwrap(), intensity);
        }
    }

    #[test]
    fn date_display_truncates_server_timestamps() {
        let mut activity = running();
        activity.date = "2024-01-01T00:00:00.000Z".to_string();
        assert_eq!(activity.date_display(), "2024-01-01");
        // the stored value keeps the suffix
        assert_eq!(activity.date, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn date_display_leaves_short_dates_alone() {
        assert_eq!(running().date_display(), "2024-01-01");
    }

    #[test]
    fn parsed_date_ignores_time_suffix() {
        let mut activity = running();
        activity.date = "2024-03-05T12:30:00Z".to_string();
        assert_eq!(
            activity.parsed_date().unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = ActivityPatch {
            duration_minutes: Some(60),
            ..Default::default()
        };
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json, serde_json::json!({"durationMinutes": 60}));
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(ActivityPatch::default().is_empty());
        let patch = ActivityPatch {
            notes: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_from_activity_carries_every_field() {
        let mut activity = running();
        activity.notes = Some("morning run".to_string());
        let json = serde_json::to_value(ActivityPatch::from(activity)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "Running",
                "durationMinutes": 30,
                "date": "2024-01-01",
                "intensity": "Alta",
                "notes": "morning run",
            })
        );
    }
}
