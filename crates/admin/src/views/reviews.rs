//! Review moderation.

use std::time::Instant;

use rust_decimal::Decimal;
use shop_console_core::ReviewId;
use tracing::{info, instrument, warn};

use super::{Confirm, report};
use crate::api::AdminApi;
use crate::config::NoticeDurations;
use crate::error::AppError;
use crate::models::Review;
use crate::notices::{Notice, NoticeBoard};

#[derive(Debug)]
pub struct ReviewsView {
    api: AdminApi,
    reviews: Vec<Review>,
    notices: NoticeBoard,
}

impl ReviewsView {
    #[must_use]
    pub fn new(api: AdminApi, notices: NoticeDurations) -> Self {
        Self {
            api,
            reviews: Vec::new(),
            notices: NoticeBoard::new(notices),
        }
    }

    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Mean star rating, one decimal place.
    #[must_use]
    pub fn average_rating(&self) -> Option<Decimal> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.stars())).sum();
        let avg = Decimal::from(total) / Decimal::from(self.reviews.len());
        Some(avg.round_dp(1))
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
        match self.api.list_reviews().await {
            Ok(response) => {
                self.reviews = response.data_or_default().reviews;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to load reviews")),
        }
    }

    /// Re-fetch after a successful write. The write stands even if this
    /// fails; the stale list is kept.
    async fn reload(&mut self) {
        match self.api.list_reviews().await {
            Ok(response) => self.reviews = response.data_or_default().reviews,
            Err(e) => warn!(error = %e, "Failed to refresh reviews after update"),
        }
    }

    /// Delete after confirmation. `Ok(false)` when declined.
    ///
    /// # Errors
    ///
    /// Backend failure.
    #[instrument(skip(self, confirm), fields(review_id = %id))]
    pub async fn delete(&mut self, id: &ReviewId, confirm: &dyn Confirm) -> Result<bool, AppError> {
        if !confirm.confirm("Delete this review?") {
            return Ok(false);
        }
        match self.api.delete_review(id).await {
            Ok(response) => {
                info!(review_id = %id, "Review deleted");
                self.notices
                    .success(response.message_or("Review deleted"), Instant::now());
                self.reload().await;
                Ok(true)
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to delete review")),
        }
    }
}
