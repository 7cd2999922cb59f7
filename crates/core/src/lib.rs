//! Business logic for bizlist.
//!
//! Services take the caller's identity explicitly (a `user::Model` resolved by
//! the HTTP layer) and return [`bizlist_common::AppResult`].

pub mod services;

pub use services::*;
