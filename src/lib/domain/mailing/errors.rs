//! Mailing errors

use lettre::address::AddressError;
use minijinja::ErrorKind;
use thiserror::Error;
use tracing::debug;

/// A boxed error from the underlying transport
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while rendering a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template source is not valid template syntax
    #[error("invalid template syntax: {0}")]
    Parse(minijinja::Error),

    /// The template parsed but could not be evaluated
    #[error("template could not be rendered: {0}")]
    Render(minijinja::Error),
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        debug!("minijinja::Error -> TemplateError");

        match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => TemplateError::Parse(err),
            _ => TemplateError::Render(err),
        }
    }
}

/// Errors produced by a single SMTP session, one variant per protocol stage
#[derive(Debug, Error)]
pub enum TransportError {
    /// TLS parameters could not be built for the server name
    #[error("could not configure TLS")]
    Tls(#[source] BoxError),

    /// The TLS dial, server greeting or EHLO failed
    #[error("could not connect to the SMTP server")]
    Connect(#[source] BoxError),

    /// AUTH was rejected or failed
    #[error("authentication failed")]
    Auth(#[source] BoxError),

    /// MAIL FROM or RCPT TO was rejected
    #[error("envelope was rejected")]
    Envelope(#[source] BoxError),

    /// DATA was rejected or the message could not be transmitted
    #[error("message transmission failed")]
    Data(#[source] BoxError),
}

/// Errors produced while sending to a single recipient
#[derive(Debug, Error)]
pub enum SendError {
    /// The recipient mapping has no value for the configured address field
    #[error("recipient has no `{0}` field")]
    MissingField(String),

    /// An address could not be parsed
    #[error("invalid email address `{address}`")]
    InvalidAddress {
        /// The raw address
        address: String,

        /// Why it was rejected
        #[source]
        source: AddressError,
    },

    /// The body could not be rendered
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The SMTP session failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for SendError {
    fn from(err: anyhow::Error) -> Self {
        SendError::UnknownError(err)
    }
}

impl From<lettre::error::Error> for SendError {
    fn from(err: lettre::error::Error) -> Self {
        debug!("lettre::error::Error -> SendError");

        SendError::UnknownError(err.into())
    }
}

/// A failed send within a batch, tagged with the recipient it was meant for
#[derive(Debug, Error)]
#[error("{recipient}: {error}")]
pub struct RecipientError {
    /// The recipient address, or the raw mapping value if it could not be resolved
    pub recipient: String,

    /// What went wrong
    pub error: SendError,
}
