//! Sender configuration

use std::{fmt, time::Duration};

use clap::Parser;

/// SMTP sender configuration
#[derive(Clone, Parser)]
pub struct SmtpConfig {
    /// The sender display name
    #[clap(long = "mail-name", env = "MAIL_NAME", default_value = "")]
    pub name: String,

    /// The sender email address, also used as the AUTH username
    #[clap(long = "mail-addr", env = "MAIL_ADDR")]
    pub mail: String,

    /// The sender password
    #[clap(long = "mail-pass", env = "MAIL_PASS", hide_env_values = true)]
    pub password: String,

    /// The SMTP host
    #[clap(long = "mail-serv", env = "MAIL_SERV")]
    pub server: String,

    /// The SMTP port (implicit TLS)
    #[clap(long = "mail-port", env = "MAIL_PORT", default_value = "465")]
    pub port: u16,

    /// Verify the server's TLS certificate. Disabling this is insecure.
    #[clap(
        long = "mail-verify-tls",
        env = "MAIL_VERIFY_TLS",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub verify_tls: bool,

    /// Timeout in seconds for connecting and for each SMTP command
    #[clap(long = "mail-timeout", env = "MAIL_TIMEOUT", default_value = "30")]
    pub timeout_secs: u64,
}

impl SmtpConfig {
    /// Creates a config that verifies certificates and uses the default timeout
    pub fn new(name: &str, mail: &str, password: &str, server: &str, port: u16) -> Self {
        Self {
            name: name.to_string(),
            mail: mail.to_string(),
            password: password.to_string(),
            server: server.to_string(),
            port,
            verify_tls: true,
            timeout_secs: 30,
        }
    }

    /// Timeout for connecting and for each SMTP command
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("name", &self.name)
            .field("mail", &self.mail)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
