#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a templated HTML mail to every recipient in a JSON file

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use smtp_mailer::{
    domain::mailing::{FieldMapping, Mail, Mailer, Recipient, SmtpConfig, DEFAULT_CONCURRENCY},
    infrastructure::email::smtp::SmtpTransport,
};
use tracing::{error, info};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP sender configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// Path to the HTML template
    #[clap(long, env = "MAIL_TEMPLATE")]
    pub template: PathBuf,

    /// The subject line
    #[clap(long, env = "MAIL_SUBJECT")]
    pub subject: String,

    /// Path to a JSON array of recipient objects
    #[clap(long, env = "MAIL_RECIPIENTS")]
    pub recipients: PathBuf,

    /// Recipient key holding the display name
    #[clap(long, env = "MAIL_NAME_FIELD", default_value = "NAME")]
    pub name_field: String,

    /// Recipient key holding the email address
    #[clap(long, env = "MAIL_ADDR_FIELD", default_value = "MAIL")]
    pub mail_field: String,

    /// Maximum number of concurrent SMTP sessions
    #[clap(long, env = "MAIL_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine, everything can come from flags or the environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let template = tokio::fs::read_to_string(&args.template)
        .await
        .with_context(|| format!("could not read template {}", args.template.display()))?;

    let recipients: Vec<Recipient> = serde_json::from_slice(
        &tokio::fs::read(&args.recipients)
            .await
            .with_context(|| format!("could not read recipients {}", args.recipients.display()))?,
    )
    .context("recipients must be a JSON array of string-to-string objects")?;

    let mail = Mail::new(&template, &args.subject);
    let fields = FieldMapping::new(&args.name_field, &args.mail_field);
    let mailer = Mailer::new(Arc::new(SmtpTransport::new())).with_concurrency(args.concurrency);

    let errors = mailer
        .send_to_many(&mail, &recipients, &args.smtp, &fields)
        .await;

    for err in &errors {
        error!(recipient = %err.recipient, error = ?err.error, "could not send mail");
    }

    if !errors.is_empty() {
        bail!("{} of {} sends failed", errors.len(), recipients.len());
    }

    info!(recipients = recipients.len(), "all mail sent");

    Ok(())
}
