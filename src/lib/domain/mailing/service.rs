//! Single and batch sends

use std::sync::Arc;

use futures::{future, stream, StreamExt};
use lettre::{address::Envelope, message::Mailbox, Address};
use tracing::{debug, info};

use super::{
    config::SmtpConfig,
    errors::{RecipientError, SendError},
    headers::build_headers,
    mail::Mail,
    recipient::{FieldMapping, Recipient},
    template::render,
    transport::Transport,
};

/// Default cap on concurrent sessions in a batch send
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Sends templated mail through a [`Transport`]
#[derive(Debug)]
pub struct Mailer<T>
where
    T: Transport,
{
    transport: Arc<T>,
    concurrency: usize,
}

impl<T> Clone for Mailer<T>
where
    T: Transport,
{
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            concurrency: self.concurrency,
        }
    }
}

impl<T> Mailer<T>
where
    T: Transport,
{
    /// Creates a new mailer with [`DEFAULT_CONCURRENCY`]
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Caps how many sessions a batch send opens at once (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Builds the envelope and the full message (headers, blank line, body)
    fn compose(
        &self,
        mail: &Mail,
        recipient: &Recipient,
        config: &SmtpConfig,
        fields: &FieldMapping,
    ) -> Result<(Envelope, String), SendError> {
        let sender = config
            .mail
            .trim()
            .parse::<Address>()
            .map_err(|source| SendError::InvalidAddress {
                address: config.mail.clone(),
                source,
            })?;
        let name = Some(config.name.clone()).filter(|name| !name.trim().is_empty());
        let from = Mailbox::new(name, sender);
        let to = recipient.mailbox(fields)?;

        let headers = build_headers(&from, &to, mail.subject());
        let body = render(mail.template(), recipient)?;

        let envelope = Envelope::new(Some(from.email), vec![to.email])?;

        Ok((envelope, format!("{headers}\r\n{body}")))
    }

    /// Sends the mail to one recipient over its own session
    ///
    /// # Arguments
    /// * `mail` - The subject and template.
    /// * `recipient` - The To fields and template variables.
    /// * `config` - The sender credentials and server.
    /// * `fields` - Which recipient keys hold the To name and address.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the server has accepted the message.
    pub async fn send_to(
        &self,
        mail: &Mail,
        recipient: &Recipient,
        config: &SmtpConfig,
        fields: &FieldMapping,
    ) -> Result<(), SendError> {
        let (envelope, message) = self.compose(mail, recipient, config, fields)?;

        debug!(
            to = ?envelope.to(),
            bytes = message.len(),
            "message composed"
        );

        self.transport
            .deliver(config, &envelope, message.as_bytes())
            .await?;

        info!(to = ?envelope.to(), subject = mail.subject(), "mail sent");

        Ok(())
    }

    /// Sends the mail to every recipient, one session each.
    ///
    /// At most `concurrency` sessions are open at once. A failure never stops the
    /// other sends; the returned list holds one error per failed recipient, in
    /// completion order, and is empty when every send succeeded.
    pub async fn send_to_many(
        &self,
        mail: &Mail,
        recipients: &[Recipient],
        config: &SmtpConfig,
        fields: &FieldMapping,
    ) -> Vec<RecipientError> {
        info!(
            recipients = recipients.len(),
            concurrency = self.concurrency,
            "starting batch send"
        );

        let errors: Vec<RecipientError> = stream::iter(recipients)
            .map(|recipient| async move {
                self.send_to(mail, recipient, config, fields)
                    .await
                    .map_err(|error| RecipientError {
                        recipient: recipient.label(fields),
                        error,
                    })
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|result| future::ready(result.err()))
            .inspect(|err| debug!(recipient = %err.recipient, error = %err.error, "send failed"))
            .collect()
            .await;

        info!(
            recipients = recipients.len(),
            failed = errors.len(),
            "batch send finished"
        );

        errors
    }
}
