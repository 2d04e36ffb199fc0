//! Shop console CLI - order workflow and store administration from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (token is kept in the session file)
//! shop-console login -e admin@shop.example
//!
//! # Orders with a pending cancellation request
//! shop-console orders list --cancellation cancellation-requested
//!
//! # Approve a cancellation, then refund it
//! shop-console orders approve 65f1c0ffee
//! shop-console orders refund 65f1c0ffee
//!
//! # Dashboard for the last 90 days
//! shop-console dashboard --period 90d
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_CONSOLE_API_URL` - Backend base URL (required)
//! - `SHOP_CONSOLE_SESSION_FILE` - Session file (default: `.shop-console-session.json`)
//! - `SHOP_CONSOLE_PASSWORD` - Password for `login` when not prompted
//! - `SHOP_CONSOLE_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Error reporting (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shop_console::api::Period;
use shop_console_core::{OrderStatus, Price};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "shop-console")]
#[command(author, version, about = "Shop admin console")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "SHOP_CONSOLE_API_URL", global = true)]
    api_url: Option<String>,

    /// Where the session token is kept between runs
    #[arg(
        long,
        env = "SHOP_CONSOLE_SESSION_FILE",
        default_value = ".shop-console-session.json",
        global = true
    )]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as an administrator
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long, env = "SHOP_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in administrator
    Whoami,
    /// Order workflow
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Sales, revenue, stock and customer figures
    Dashboard {
        /// Reporting window (7d, 30d, 90d, 1y)
        #[arg(short, long, default_value = "30d")]
        period: Period,
    },
    /// Customer accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Shop products and loved items
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Category tree
    Categories {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Site announcements
    Announcements {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Review moderation
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        /// Only these statuses (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<OrderStatus>,

        /// Cancellation bucket (all, no-cancellation, cancellation-requested,
        /// cancelled, cancellation-rejected)
        #[arg(short, long, default_value = "all")]
        cancellation: String,

        /// Match id, customer name, email or phone
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one order and the actions available on it
    Show { id: String },
    /// Move an order to a new status
    #[command(alias = "status")]
    SetStatus { id: String, status: OrderStatus },
    /// Approve a pending cancellation request
    Approve { id: String },
    /// Reject a pending cancellation request
    Reject {
        id: String,

        /// Reason shown to the customer
        #[arg(short, long)]
        reason: String,
    },
    /// Refund an approved cancellation
    Refund { id: String },
    /// Confirm cash collected for a delivered COD order
    ConfirmCod {
        id: String,

        /// Amount collected (defaults to the remaining balance)
        #[arg(short, long)]
        amount: Option<Price>,
    },
    /// Write the order list as CSV
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List customers
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Block a customer
    Block { id: String },
    /// Unblock a customer
    Unblock { id: String },
    /// Set a new password for a customer
    ResetPassword {
        id: String,

        #[arg(short, long, env = "SHOP_CONSOLE_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Delete a customer
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Loved items instead of the shop catalog
        #[arg(long)]
        loved: bool,
    },
    /// Delete a product
    Delete {
        id: String,

        #[arg(long)]
        loved: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// List records
    List,
}

#[derive(Subcommand)]
enum ReviewAction {
    /// List reviews
    List,
    /// Delete a review
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|d| !d.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shop_console=info,shop_console_cli=info".into());

    let json = std::env::var("SHOP_CONSOLE_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::new(cli.api_url.as_deref(), cli.session_file)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, password.into()).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Orders { action } => match action {
            OrderAction::List {
                status,
                cancellation,
                search,
            } => commands::orders::list(&ctx, status, &cancellation, search).await?,
            OrderAction::Show { id } => commands::orders::show(&ctx, &id.into()).await?,
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(&ctx, &id.into(), status).await?;
            }
            OrderAction::Approve { id } => commands::orders::approve(&ctx, &id.into()).await?,
            OrderAction::Reject { id, reason } => {
                commands::orders::reject(&ctx, &id.into(), &reason).await?;
            }
            OrderAction::Refund { id } => commands::orders::refund(&ctx, &id.into()).await?,
            OrderAction::ConfirmCod { id, amount } => {
                commands::orders::confirm_cod(&ctx, &id.into(), amount).await?;
            }
            OrderAction::Export { output } => commands::orders::export(&ctx, output).await?,
        },
        Commands::Dashboard { period } => commands::dashboard::show(&ctx, period).await?,
        Commands::Users { action } => match action {
            UserAction::List { search } => commands::users::list(&ctx, search).await?,
            UserAction::Block { id } => commands::users::set_active(&ctx, &id.into(), false).await?,
            UserAction::Unblock { id } => commands::users::set_active(&ctx, &id.into(), true).await?,
            UserAction::ResetPassword { id, password } => {
                commands::users::reset_password(&ctx, &id.into(), password.into()).await?;
            }
            UserAction::Delete { id, yes } => commands::users::delete(&ctx, &id.into(), yes).await?,
        },
        Commands::Products { action } => match action {
            ProductAction::List { loved } => commands::catalog::list_products(&ctx, loved).await?,
            ProductAction::Delete { id, loved, yes } => {
                commands::catalog::delete_product(&ctx, &id.into(), loved, yes).await?;
            }
        },
        Commands::Categories { action: ListAction::List } => {
            commands::catalog::list_categories(&ctx).await?;
        }
        Commands::Announcements { action: ListAction::List } => {
            commands::content::list_announcements(&ctx).await?;
        }
        Commands::Reviews { action } => match action {
            ReviewAction::List => commands::content::list_reviews(&ctx).await?,
            ReviewAction::Delete { id, yes } => {
                commands::content::delete_review(&ctx, &id.into(), yes).await?;
            }
        },
    }
    Ok(())
}
