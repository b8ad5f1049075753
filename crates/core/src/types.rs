use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MailResult;

/// Every disposable mailbox backend implements this.
///
/// Adapters hold no per-mailbox state: whatever a later `list_messages` or
/// `read_message` call needs (token, derived key) travels in the [`Mailbox`]
/// returned by `create_mailbox`, so a failed creation leaves nothing behind.
#[async_trait]
pub trait MailProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn create_mailbox(&self) -> MailResult<Mailbox>;

    /// Transient backend trouble yields an empty listing. Only protocol-level
    /// failures (transport errors, non-2xx with an empty body) are errors.
    async fn list_messages(&self, mailbox: &Mailbox) -> MailResult<Vec<Message>>;

    /// Full content normalized to `text + "\n" + markup`.
    async fn read_message(&self, mailbox: &Mailbox, id: &str) -> MailResult<String>;
}

/// Read side of an active mailbox, as seen by the activation poller.
#[async_trait]
pub trait Inbox: Send + Sync {
    fn provider_name(&self) -> &str;
    async fn list_messages(&self) -> MailResult<Vec<Message>>;
    async fn read_message(&self, id: &str) -> MailResult<String>;
}

/// Backends in fallback priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    MailTm,
    TempMailOrg,
    Maildrop,
}

impl ProviderKind {
    pub const PRIORITY: [ProviderKind; 3] = [Self::MailTm, Self::TempMailOrg, Self::Maildrop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MailTm => "mailtm",
            Self::TempMailOrg => "tempmail_org",
            Self::Maildrop => "maildrop",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    Token(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mailbox {
    pub provider: ProviderKind,
    pub address: String,
    pub credential: Option<Credential>,
    pub created_at: DateTime<Utc>,
}

impl Mailbox {
    pub fn new(provider: ProviderKind, address: String, credential: Option<Credential>) -> Self {
        Self {
            provider,
            address,
            credential,
            created_at: Utc::now(),
        }
    }

    /// Everything before the `@`.
    pub fn local_part(&self) -> &str {
        self.address
            .split_once('@')
            .map(|(local, _)| local)
            .unwrap_or(&self.address)
    }

    pub fn token(&self) -> Option<&str> {
        match &self.credential {
            Some(Credential::Token(token)) => Some(token),
            _ => None,
        }
    }
}

/// One entry of a mailbox listing. `content` is whatever text the listing
/// itself carried and may be empty; the full body comes from `read_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub content: String,
}

impl Message {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationLink {
    pub url: String,
    pub extracted_at: DateTime<Utc>,
}

impl ActivationLink {
    pub fn new(url: String) -> Self {
        Self {
            url,
            extracted_at: Utc::now(),
        }
    }
}
