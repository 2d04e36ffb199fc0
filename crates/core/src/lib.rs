//! Shop Console Core - Shared types library.
//!
//! This crate provides the domain vocabulary shared by the console library
//! (`shop-console`) and its command-line host (`shop-console-cli`).
//!
//! # Architecture
//!
//! The core crate contains only types and pure transition logic - no I/O,
//! no HTTP clients. Everything here can be exercised without a backend.
//!
//! # Modules
//!
//! - [`types`] - String-backed ids, prices, emails, and the order lifecycle enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
