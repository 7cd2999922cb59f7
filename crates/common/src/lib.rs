//! Common utilities and shared types for bizlist.
//!
//! This crate provides foundational components used across all bizlist crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers, session tokens and slug
//!   suffixes via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use bizlist_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Listening on {}:{}, generated ID: {}", config.server.host, config.server.port, id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{Config, UnknownCategoryPolicy};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
