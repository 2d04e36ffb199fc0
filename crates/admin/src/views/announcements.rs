//! Announcement management.

use std::time::Instant;

use chrono::{DateTime, Utc};
use shop_console_core::{AnnouncementId, AnnouncementStatus};
use tracing::{info, instrument, warn};

use super::{Confirm, report};
use crate::api::AdminApi;
use crate::config::NoticeDurations;
use crate::error::AppError;
use crate::models::{Announcement, AnnouncementDraft};
use crate::notices::{Notice, NoticeBoard};
use crate::validation::{self, ValidationError};

/// Check an announcement draft.
///
/// # Errors
///
/// The first failing rule.
pub fn validate_announcement(draft: &AnnouncementDraft) -> Result<(), ValidationError> {
    validation::required("Title", &draft.title)?;
    validation::required("Content", &draft.content)?;
    if draft.display_location.iter().all(|l| l.trim().is_empty()) {
        return Err(ValidationError::NoDisplayLocation);
    }
    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if end < start {
            return Err(ValidationError::EndBeforeStart);
        }
    }
    Ok(())
}

/// Announcement list.
#[derive(Debug)]
pub struct AnnouncementsView {
    api: AdminApi,
    announcements: Vec<Announcement>,
    notices: NoticeBoard,
}

impl AnnouncementsView {
    #[must_use]
    pub fn new(api: AdminApi, notices: NoticeDurations) -> Self {
        Self {
            api,
            announcements: Vec::new(),
            notices: NoticeBoard::new(notices),
        }
    }

    #[must_use]
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Announcements shown to shoppers at `now`.
    #[must_use]
    pub fn live(&self, now: DateTime<Utc>) -> Vec<&Announcement> {
        self.announcements.iter().filter(|a| a.is_live(now)).collect()
    }

    pub fn notices(&mut self, now: Instant) -> &[Notice] {
        self.notices.visible(now)
    }

    #[must_use]
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.latest()
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), AppError> {
        match self.api.list_announcements().await {
            Ok(response) => {
                self.announcements = response.data_or_default().announcements;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to load announcements")),
        }
    }

    /// Re-fetch after a successful write. The write stands even if this
    /// fails; the stale list is kept.
    async fn reload(&mut self) {
        match self.api.list_announcements().await {
            Ok(response) => self.announcements = response.data_or_default().announcements,
            Err(e) => warn!(error = %e, "Failed to refresh announcements after update"),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&mut self, draft: &AnnouncementDraft) -> Result<(), AppError> {
        validate_announcement(draft)
            .map_err(|e| report(&mut self.notices, e, "Failed to create announcement"))?;
        match self.api.create_announcement(draft).await {
            Ok(response) => {
                info!(title = %draft.title, "Announcement created");
                self.notices
                    .success(response.message_or("Announcement created"), Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to create announcement")),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, draft), fields(announcement_id = %id))]
    pub async fn update(&mut self, id: &AnnouncementId, draft: &AnnouncementDraft) -> Result<(), AppError> {
        validate_announcement(draft)
            .map_err(|e| report(&mut self.notices, e, "Failed to update announcement"))?;
        match self.api.update_announcement(id, draft).await {
            Ok(response) => {
                info!(announcement_id = %id, "Announcement updated");
                self.notices
                    .success(response.message_or("Announcement updated"), Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to update announcement")),
        }
    }

    /// Change only the publication state of a loaded announcement.
    ///
    /// # Errors
    ///
    /// `NotFound`, validation or backend failure.
    pub async fn set_status(
        &mut self,
        id: &AnnouncementId,
        status: AnnouncementStatus,
    ) -> Result<(), AppError> {
        let Some(current) = self.announcements.iter().find(|a| &a.id == id) else {
            return Err(report(
                &mut self.notices,
                AppError::NotFound(format!("announcement {id}")),
                "Announcement not found",
            ));
        };
        let draft = AnnouncementDraft {
            status,
            ..AnnouncementDraft::from(current)
        };
        self.update(id, &draft).await
    }

    /// Delete after confirmation. `Ok(false)` when declined.
    ///
    /// # Errors
    ///
    /// Backend failure.
    #[instrument(skip(self, confirm), fields(announcement_id = %id))]
    pub async fn delete(&mut self, id: &AnnouncementId, confirm: &dyn Confirm) -> Result<bool, AppError> {
        if !confirm.confirm("Delete this announcement?") {
            return Ok(false);
        }
        match self.api.delete_announcement(id).await {
            Ok(response) => {
                info!(announcement_id = %id, "Announcement deleted");
                self.notices
                    .success(response.message_or("Announcement deleted"), Instant::now());
                self.reload().await;
                Ok(true)
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to delete announcement")),
        }
    }
}
