pub use entity::{deletion_preferences, service::Service};

pub mod deletion_preference;
pub mod error;
