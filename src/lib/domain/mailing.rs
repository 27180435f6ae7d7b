//! Templated mail: rendering, headers, and per-recipient delivery.

mod config;
mod headers;
mod mail;
mod recipient;
mod service;
mod template;
mod transport;

pub mod errors;

pub use config::SmtpConfig;
pub use headers::build_headers;
pub use mail::Mail;
pub use recipient::{FieldMapping, Recipient};
pub use service::{Mailer, DEFAULT_CONCURRENCY};
pub use template::render;
pub use transport::Transport;
