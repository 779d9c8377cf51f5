//! store
//!
//! Content persistence backends.
//!
//! # Architecture
//!
//! The [`ContentStore`] trait is the seam between the HTTP layer and
//! persistence. Two implementations exist:
//!
//! - [`github`]: atomic multi-file commits against the GitHub git data API,
//!   plus single-file deletion via the contents API
//! - [`local`]: direct filesystem writes for credential-less development
//!
//! [`factory::create_store`] picks one from configuration at startup.
//! [`mock`] provides a deterministic in-memory implementation for tests.

mod factory;
pub mod github;
pub mod local;
pub mod mock;
mod traits;

pub use factory::{create_store, StoreBackend};
pub use traits::*;
