//! Kalem - content publishing service for a markdown-driven website
//!
//! Kalem persists blog articles for a statically-built site. In production
//! every save becomes exactly one commit on the site repository's content
//! branch, built through the GitHub git data API (blob → tree → commit → ref
//! update) so a multi-file change is never visible half-applied. In local
//! development without credentials, saves fall back to plain filesystem
//! writes.
//!
//! # Architecture
//!
//! - [`api`] - HTTP surface for the editorial client (axum handlers)
//! - [`content`] - slug sanitization, article paths, commit messages
//! - [`store`] - the `ContentStore` seam and its GitHub/local backends
//! - [`config`] - environment-driven configuration, loaded once at startup
//!
//! # Correctness notes
//!
//! - Only the final ref update mutates the branch; any earlier failure
//!   leaves the branch exactly as it was.
//! - No operation retries; every failure is terminal and reported with the
//!   step it happened in.
//! - Concurrent commits race on the branch ref: the last ref update wins
//!   and the other revision becomes unreachable. This is a documented
//!   property of the current design, not an accident.

pub mod api;
pub mod config;
pub mod content;
pub mod store;
