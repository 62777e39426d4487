//! Login and preference logic shared by the HTTP layer.
//!
//! `web` depends on this crate only; provider plumbing (`provider_auth`) and
//! persistence (`entity_api`) are re-exported here where handlers need them.

pub use entity_api::Service;
pub use provider_auth::oauth::{ProviderKind, UserInfo};

pub mod deletion_preference;
pub mod error;
pub mod jwt;
pub mod login;
