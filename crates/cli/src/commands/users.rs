//! Customer account commands.

use secrecy::SecretString;
use shop_console::views::UsersView;
use shop_console_core::UserId;

use super::{CliError, Context, confirmer};

async fn loaded_view(ctx: &Context) -> Result<UsersView, CliError> {
    ctx.require_login()?;
    let mut view = UsersView::new(ctx.api.clone(), ctx.config.notices);
    let loaded = view.load().await;
    ctx.report_session_end();
    loaded?;
    Ok(view)
}

fn print_outcome(view: &UsersView) {
    if let Some(notice) = view.latest_notice() {
        println!("{}", notice.message);
    }
}

/// # Errors
///
/// Not logged in or backend failure.
pub async fn list(ctx: &Context, search: Option<String>) -> Result<(), CliError> {
    let mut view = loaded_view(ctx).await?;
    view.set_search(search.unwrap_or_default());
    for user in view.visible_users() {
        let state = if user.is_active { "active" } else { "blocked" };
        let source = if user.is_google_account() { "google" } else { "email" };
        println!("{:<26} {:<8} {:<7} {} <{}>", user.id.as_str(), state, source, user.name, user.email);
    }
    Ok(())
}

/// Block or unblock; a user already in the wanted state is left alone.
///
/// # Errors
///
/// Unknown user or backend failure.
pub async fn set_active(ctx: &Context, id: &UserId, active: bool) -> Result<(), CliError> {
    let mut view = loaded_view(ctx).await?;
    let current = view
        .user(id)
        .map(|u| u.is_active)
        .ok_or_else(|| CliError::NotFound(format!("user {id}")))?;
    if current == active {
        println!("User {id} is already {}", if active { "active" } else { "blocked" });
        return Ok(());
    }
    let result = view.toggle_active(id).await;
    ctx.report_session_end();
    result?;
    print_outcome(&view);
    Ok(())
}

/// # Errors
///
/// Google account, password rules or backend failure.
pub async fn reset_password(ctx: &Context, id: &UserId, password: SecretString) -> Result<(), CliError> {
    let mut view = loaded_view(ctx).await?;
    let result = view.reset_password(id, &password, &password).await;
    ctx.report_session_end();
    result?;
    print_outcome(&view);
    Ok(())
}

/// # Errors
///
/// Backend failure.
pub async fn delete(ctx: &Context, id: &UserId, yes: bool) -> Result<(), CliError> {
    let mut view = loaded_view(ctx).await?;
    let result = view.delete(id, &confirmer(yes)).await;
    ctx.report_session_end();
    if result? {
        print_outcome(&view);
    } else {
        println!("Cancelled");
    }
    Ok(())
}
