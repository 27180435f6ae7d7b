//! SMTP transport over implicit TLS

use async_trait::async_trait;
use lettre::{
    address::Envelope,
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{AsyncSmtpConnection, TlsParameters},
        commands,
        extension::ClientId,
    },
};
use tracing::{debug, warn};

use crate::domain::mailing::{errors::TransportError, SmtpConfig, Transport};

/// SMTP transport: one implicit-TLS session per delivery, authenticated with AUTH PLAIN
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    hello_name: ClientId,
    implicit_tls: bool,
}

impl SmtpTransport {
    /// Create a new SMTP transport greeting servers with the local hostname
    pub fn new() -> Self {
        Self {
            hello_name: ClientId::default(),
            implicit_tls: true,
        }
    }

    /// Speaks SMTP without TLS, for scripted loopback servers
    #[cfg(test)]
    fn plaintext() -> Self {
        Self {
            implicit_tls: false,
            ..Self::new()
        }
    }

    fn tls_parameters(config: &SmtpConfig) -> Result<TlsParameters, TransportError> {
        if !config.verify_tls {
            warn!(
                server = %config.server,
                "TLS certificate verification is disabled, the server's identity is not checked"
            );
        }

        TlsParameters::builder(config.server.clone())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|err| TransportError::Tls(err.into()))
    }

    /// TLS dial, greeting and EHLO
    async fn connect(&self, config: &SmtpConfig) -> Result<AsyncSmtpConnection, TransportError> {
        let tls = if self.implicit_tls {
            Some(Self::tls_parameters(config)?)
        } else {
            None
        };

        let connection = AsyncSmtpConnection::connect_tokio1(
            (config.server.as_str(), config.port),
            Some(config.timeout()),
            &self.hello_name,
            tls,
            None,
        )
        .await
        .map_err(|err| TransportError::Connect(err.into()))?;

        debug!(server = %config.server, port = config.port, "connected");

        Ok(connection)
    }

    /// AUTH, MAIL FROM, RCPT TO, DATA and the message itself, each reply checked
    async fn transact(
        connection: &mut AsyncSmtpConnection,
        config: &SmtpConfig,
        envelope: &Envelope,
        message: &[u8],
    ) -> Result<(), TransportError> {
        let credentials = Credentials::new(config.mail.clone(), config.password.clone());

        connection
            .auth(&[Mechanism::Plain], &credentials)
            .await
            .map_err(|err| TransportError::Auth(err.into()))?;

        debug!(user = %config.mail, "authenticated");

        connection
            .command(commands::Mail::new(envelope.from().cloned(), vec![]))
            .await
            .map_err(|err| TransportError::Envelope(err.into()))?;

        for to in envelope.to() {
            connection
                .command(commands::Rcpt::new(to.clone(), vec![]))
                .await
                .map_err(|err| TransportError::Envelope(err.into()))?;
        }

        connection
            .command(commands::Data)
            .await
            .map_err(|err| TransportError::Data(err.into()))?;

        connection
            .message(message)
            .await
            .map_err(|err| TransportError::Data(err.into()))?;

        debug!("message accepted");

        Ok(())
    }
}

impl Default for SmtpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn deliver(
        &self,
        config: &SmtpConfig,
        envelope: &Envelope,
        message: &[u8],
    ) -> Result<(), TransportError> {
        let mut connection = self.connect(config).await?;

        // the session exists from here on, so it is closed on every path
        let result = Self::transact(&mut connection, config, envelope, message).await;

        match &result {
            Ok(()) => {
                if let Err(err) = connection.quit().await {
                    warn!(error = %err, "QUIT failed after delivery");
                }
            }
            Err(_) => connection.abort().await,
        }

        result
    }
}
