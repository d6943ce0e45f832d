//! Registration mirror
//!
//! Every successful registration is copied to an external spreadsheet through
//! a webhook that appends one row per call. The mirror is best-effort: the
//! caller logs a failure and carries on.

use std::time::Duration;

use alumni_core::Account;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const NOT_PROVIDED: &str = "Not Provided";

/// One spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegistrationRow {
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub interests: String,
    pub experience: String,
}

impl From<&Account> for RegistrationRow {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            email: account.email.clone(),
            occupation: account.occupation.clone(),
            interests: account
                .interests
                .clone()
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            experience: account
                .experience
                .clone()
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
        }
    }
}

#[async_trait]
pub trait RegistrationMirror: Send + Sync {
    async fn append(&self, row: &RegistrationRow) -> anyhow::Result<()>;
}

/// Posts rows as JSON to a spreadsheet webhook
#[derive(Debug, Clone)]
pub struct WebhookMirror {
    client: Client,
    url: String,
}

impl WebhookMirror {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RegistrationMirror for WebhookMirror {
    async fn append(&self, row: &RegistrationRow) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(row)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
