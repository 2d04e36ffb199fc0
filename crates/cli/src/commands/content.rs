//! Announcement and review commands.

use chrono::Utc;
use shop_console::views::{AnnouncementsView, ReviewsView};
use shop_console_core::ReviewId;

use super::{CliError, Context, confirmer};

/// # Errors
///
/// Not logged in or backend failure.
pub async fn list_announcements(ctx: &Context) -> Result<(), CliError> {
    ctx.require_login()?;
    let mut view = AnnouncementsView::new(ctx.api.clone(), ctx.config.notices);
    let loaded = view.load().await;
    ctx.report_session_end();
    loaded?;

    let now = Utc::now();
    for a in view.announcements() {
        let live = if a.is_live(now) { "live" } else { "-" };
        println!(
            "{:<26} {:<5} {:<10} {:<8} {} [{}]",
            a.id.as_str(),
            live,
            format!("{:?}", a.status).to_lowercase(),
            format!("{:?}", a.priority).to_lowercase(),
            a.title,
            a.display_location.join(",")
        );
    }
    Ok(())
}

async fn loaded_reviews(ctx: &Context) -> Result<ReviewsView, CliError> {
    ctx.require_login()?;
    let mut view = ReviewsView::new(ctx.api.clone(), ctx.config.notices);
    let loaded = view.load().await;
    ctx.report_session_end();
    loaded?;
    Ok(view)
}

/// # Errors
///
/// Not logged in or backend failure.
pub async fn list_reviews(ctx: &Context) -> Result<(), CliError> {
    let view = loaded_reviews(ctx).await?;
    for review in view.reviews() {
        let product = review
            .product
            .as_ref()
            .and_then(|p| p.name())
            .unwrap_or("-");
        println!(
            "{:<26} {:<5} {:<24} {:<16} {}",
            review.id.as_str(),
            "*".repeat(usize::from(review.stars())),
            product,
            review.name,
            review.comment
        );
    }
    if let Some(avg) = view.average_rating() {
        println!("\n{} reviews, average {avg}", view.reviews().len());
    }
    Ok(())
}

/// # Errors
///
/// Backend failure.
pub async fn delete_review(ctx: &Context, id: &ReviewId, yes: bool) -> Result<(), CliError> {
    let mut view = loaded_reviews(ctx).await?;
    let result = view.delete(id, &confirmer(yes)).await;
    ctx.report_session_end();
    if result? {
        if let Some(notice) = view.latest_notice() {
            println!("{}", notice.message);
        }
    } else {
        println!("Cancelled");
    }
    Ok(())
}
