//! Typed records exchanged with the shop backend.
//!
//! Every record is camelCase JSON. Ids arrive as `_id` (with `id` accepted
//! as an alias), unknown fields are ignored and missing optional fields
//! fall back to their defaults. Older records carry explicit `null`s for
//! plain fields; those read as the default too.

use serde::{Deserialize, Deserializer};

pub mod admin;
pub mod analytics;
pub mod announcement;
pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use admin::*;
pub use analytics::*;
pub use announcement::*;
pub use catalog::*;
pub use order::*;
pub use review::*;
pub use user::*;

/// Read `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
