//! Server-rendered pages.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Error, WebErrorKind};

pub(crate) const TITLE: &str = "UnRustleLogs";
const INDEX: &str = "index";

/// Login and deletion status for one provider.
#[derive(Debug, Default, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub email: Option<String>,
    pub logged_in: bool,
    pub is_deleting: bool,
}

/// Everything the landing page shows.
#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub title: &'static str,
    pub twitch: ProviderStatus,
    pub destinygg: ProviderStatus,
    /// Outcome of the toggle that redirected here, `"true"` or `"false"`.
    pub delete_status: Option<String>,
}

pub(crate) fn templates() -> Result<Handlebars<'static>, Error> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(INDEX, include_str!("../templates/index.hbs"))
        .map_err(|err| Error::Web(WebErrorKind::Template(err.to_string())))?;
    Ok(handlebars)
}

pub(crate) fn render_index(
    handlebars: &Handlebars<'static>,
    payload: &StatusPayload,
) -> Result<String, Error> {
    handlebars
        .render(INDEX, payload)
        .map_err(|err| Error::Web(WebErrorKind::Template(err.to_string())))
}
