//! Resource CRUD views.
//!
//! Every view follows the same contract:
//! - `load` fetches the list and replaces local state
//! - forms are validated before any request; a failed check posts an error
//!   notice and returns [`AppError::Validation`]
//! - successful writes post a notice and re-fetch the list instead of
//!   patching it; a failed re-fetch is logged and the write still succeeds
//! - deletes ask a [`Confirm`] first and return `Ok(false)` when declined

mod announcements;
mod categories;
mod products;
mod reviews;
mod users;

pub use announcements::{AnnouncementsView, validate_announcement};
pub use categories::{CategoriesView, CategoryForm, CategorySubmission};
pub use products::{ProductForm, ProductSubmission, ProductsView};
pub use reviews::ReviewsView;
pub use users::{UserForm, UsersView};

use std::time::Instant;

use tracing::{error, warn};

use crate::error::AppError;
use crate::notices::NoticeBoard;

/// Asks the operator to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Post `err` as an error notice and hand it back.
fn report(notices: &mut NoticeBoard, err: impl Into<AppError>, fallback: &str) -> AppError {
    let err = err.into();
    if err.is_local() {
        warn!(error = %err, "Form rejected");
    } else {
        error!(error = %err, "{fallback}");
    }
    notices.error(err.user_message(fallback), Instant::now());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        let no = |prompt: &str| prompt.is_empty();
        assert!(yes.confirm("Delete?"));
        assert!(!no.confirm("Delete?"));
    }

    #[test]
    fn test_report_posts_notice() {
        let mut notices = NoticeBoard::default();
        let err = report(&mut notices, ValidationError::NegativeStock, "Failed");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            notices.latest().map(|n| n.message.as_str()),
            Some("Stock cannot be negative")
        );
    }
}
