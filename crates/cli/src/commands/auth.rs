//! Login, logout and session inspection.

use secrecy::SecretString;

use super::{CliError, Context};

/// Log in and persist the session.
///
/// # Errors
///
/// Backend rejection or session storage failure.
pub async fn login(ctx: &Context, email: &str, password: SecretString) -> Result<(), CliError> {
    let response = ctx.api.login(email.trim(), &password).await?;
    match &response.data {
        Some(data) => println!("Logged in as {} <{}>", data.admin.name, data.admin.email),
        None => println!("{}", response.message_or("Logged in")),
    }
    Ok(())
}

/// Forget the stored session.
pub fn logout(ctx: &Context) {
    ctx.api.logout();
    println!("Logged out");
}

/// Check the token with the backend and print the admin it belongs to.
///
/// # Errors
///
/// Not logged in, or the backend rejected the token.
pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    if !ctx.api.session().is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }
    let verified = ctx.api.verify().await;
    ctx.report_session_end();
    let admin = verified?.data.and_then(|d| d.admin);

    match admin.or(ctx.api.session().profile()?) {
        Some(admin) => {
            println!("{} <{}>", admin.name, admin.email);
            if let Some(role) = admin.role {
                println!("role: {role}");
            }
        }
        None => println!("Logged in (profile unavailable)"),
    }
    Ok(())
}
