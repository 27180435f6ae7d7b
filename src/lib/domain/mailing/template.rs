//! HTML template rendering

use std::borrow::Cow;

use lazy_static::lazy_static;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use regex::Regex;

use super::{errors::TemplateError, recipient::Recipient};

lazy_static! {
    static ref DOT_FIELD_REGEX: Regex = Regex::new(r"\{\{(-?)\s*\.([A-Za-z_])").unwrap();
}

/// Rewrites `{{.NAME}}` placeholders to `{{ NAME}}` so both forms look up the same field
fn normalize(template: &str) -> Cow<'_, str> {
    DOT_FIELD_REGEX.replace_all(template, "{{$1 $2")
}

/// Renders an HTML template with a recipient's fields.
///
/// Field values are HTML-escaped and fields missing from the recipient render as empty.
pub fn render(template: &str, recipient: &Recipient) -> Result<String, TemplateError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    env.set_auto_escape_callback(|_| AutoEscape::Html);

    Ok(env.render_str(&normalize(template), recipient)?)
}
