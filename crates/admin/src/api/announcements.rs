//! Announcement endpoints.

use serde::Deserialize;
use shop_console_core::AnnouncementId;
use tracing::instrument;

use super::{Ack, AdminApi, ApiResponse};
use crate::http::ApiError;
use crate::models::{Announcement, AnnouncementDraft};

const BASE: &str = "/api/announcements/admin";

/// `data` of the admin listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnnouncementsPayload {
    pub announcements: Vec<Announcement>,
}

/// `data` of announcement writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnnouncementPayload {
    pub announcement: Option<Announcement>,
}

impl AdminApi {
    /// Every announcement, including drafts and archived ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_announcements(&self) -> Result<ApiResponse<AnnouncementsPayload>, ApiError> {
        self.http.get(BASE).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_announcement(
        &self,
        draft: &AnnouncementDraft,
    ) -> Result<ApiResponse<AnnouncementPayload>, ApiError> {
        self.http.post_json(BASE, draft).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, draft), fields(announcement_id = %id))]
    pub async fn update_announcement(
        &self,
        id: &AnnouncementId,
        draft: &AnnouncementDraft,
    ) -> Result<ApiResponse<AnnouncementPayload>, ApiError> {
        self.http.put_json(&format!("{BASE}/{id}"), draft).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(announcement_id = %id))]
    pub async fn delete_announcement(&self, id: &AnnouncementId) -> Result<Ack, ApiError> {
        self.http.delete(&format!("{BASE}/{id}")).await
    }
}
