pub mod prelude;

pub mod deletion_preferences;
pub mod service;
