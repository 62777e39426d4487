pub(crate) mod deletion_controller;
pub(crate) mod index_controller;
pub(crate) mod oauth_controller;
