//! Site-wide announcements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_console_core::{AnnouncementId, AnnouncementPriority, AnnouncementStatus, AnnouncementType};

/// Page keys an announcement can be shown on.
pub const DISPLAY_LOCATIONS: [&str; 6] = ["home", "shop", "product", "cart", "checkout", "all"];

/// An announcement as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id", alias = "id")]
    pub id: AnnouncementId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: AnnouncementType,
    #[serde(default)]
    pub priority: AnnouncementPriority,
    #[serde(default)]
    pub status: AnnouncementStatus,
    #[serde(default)]
    pub display_location: Vec<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub style: AnnouncementStyle,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub click_count: u64,
}

impl Announcement {
    /// Whether the announcement is live at `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == AnnouncementStatus::Active
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| now <= end)
    }
}

/// Presentation fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementStyle {
    pub background_color: String,
    pub text_color: String,
    pub is_dismissible: bool,
    pub show_icon: bool,
}

impl Default for AnnouncementStyle {
    fn default() -> Self {
        Self {
            background_color: "#3B82F6".to_string(),
            text_color: "#FFFFFF".to_string(),
            is_dismissible: true,
            show_icon: true,
        }
    }
}

/// Body of announcement create/update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    pub priority: AnnouncementPriority,
    pub status: AnnouncementStatus,
    pub display_location: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub style: AnnouncementStyle,
}

impl Default for AnnouncementDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            kind: AnnouncementType::default(),
            priority: AnnouncementPriority::default(),
            status: AnnouncementStatus::default(),
            display_location: vec!["home".to_string()],
            start_date: None,
            end_date: None,
            style: AnnouncementStyle::default(),
        }
    }
}

impl From<&Announcement> for AnnouncementDraft {
    fn from(a: &Announcement) -> Self {
        Self {
            title: a.title.clone(),
            content: a.content.clone(),
            kind: a.kind,
            priority: a.priority,
            status: a.status,
            display_location: a.display_location.clone(),
            start_date: a.start_date,
            end_date: a.end_date,
            style: a.style.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_and_liveness() {
        let a: Announcement = serde_json::from_value(json!({
            "_id": "an1",
            "title": "Diwali sale",
            "content": "20% off",
            "type": "promotion",
            "priority": "high",
            "status": "active",
            "displayLocation": ["home", "shop"],
            "startDate": "2024-10-01T00:00:00Z",
            "endDate": "2024-11-01T00:00:00Z",
            "backgroundColor": "#000000",
            "viewCount": 12
        }))
        .unwrap();
        assert_eq!(a.kind, AnnouncementType::Promotion);
        assert_eq!(a.style.background_color, "#000000");
        assert!(a.style.is_dismissible);

        let inside = Utc.with_ymd_and_hms(2024, 10, 15, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        assert!(a.is_live(inside));
        assert!(!a.is_live(after));
    }

    #[test]
    fn test_draft_wire_shape() {
        let value = serde_json::to_value(AnnouncementDraft {
            title: "t".to_string(),
            content: "c".to_string(),
            ..AnnouncementDraft::default()
        })
        .unwrap();
        assert_eq!(value["type"], "info");
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["displayLocation"], json!(["home"]));
        assert_eq!(value["textColor"], "#FFFFFF");
        assert!(value.get("startDate").is_none());
    }
}
