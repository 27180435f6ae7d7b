//! Delivery of a finished message

use async_trait::async_trait;
use lettre::address::Envelope;

#[cfg(test)]
use mockall::mock;

use super::{config::SmtpConfig, errors::TransportError};

/// Delivers one message to one envelope over a fresh session
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver a message
    ///
    /// # Arguments
    /// * `config` - The sender credentials and server to use.
    /// * `envelope` - The MAIL FROM / RCPT TO addresses.
    /// * `message` - The full message: header block, blank line, body.
    ///
    /// # Returns
    /// A [`Result`] identifying the protocol stage that failed, if any.
    async fn deliver(
        &self,
        config: &SmtpConfig,
        envelope: &Envelope,
        message: &[u8],
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn deliver(&self, config: &SmtpConfig, envelope: &Envelope, message: &[u8]) -> Result<(), TransportError>;
    }
}
