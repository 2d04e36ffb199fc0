//! Shop console library.
//!
//! Client-side admin console for the shop backend: authentication and
//! session handling, the order workflow (status, cancellations, refunds,
//! COD confirmation), catalog, customer and announcement management, review
//! moderation and the analytics dashboard.
//!
//! # Security
//!
//! The session token grants full admin access to the backend. It is held as
//! a [`secrecy::SecretString`] and only exposed when building the
//! `Authorization` header.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod inflight;
pub mod media;
pub mod models;
pub mod navigation;
pub mod notices;
pub mod orders;
pub mod session;
pub mod validation;
pub mod views;

pub use api::AdminApi;
pub use config::{ConsoleConfig, NoticeDurations};
pub use dashboard::{Dashboard, DashboardSnapshot, Panel};
pub use error::AppError;
pub use http::{ApiError, HttpClient};
pub use navigation::{Navigator, RouteTracker};
pub use orders::{OrderConsole, WorkflowError};
pub use session::{FileSessionStore, Session};
