/// Hash-lookup backend: the mailbox is addressed by the MD5 of the address
use async_trait::async_trait;
use inboxwatch_core::config::TempMailOrgConfig;
use inboxwatch_core::error::{MailError, MailResult};
use inboxwatch_core::{MailProvider, Mailbox, Message, ProviderKind};
use md5::{Digest, Md5};
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{info, warn};

use crate::http::{
    first_fragment, id_text, join_content, join_url, lenient_json, parse_json, random_string,
    transport_error, UNAMBIGUOUS_ALPHABET,
};

const KIND: ProviderKind = ProviderKind::TempMailOrg;
const TEXT_FIELDS: &[&str] = &["mail_text", "text", "body"];
const MARKUP_FIELDS: &[&str] = &["mail_html", "html"];
const ID_FIELDS: &[&str] = &["mail_id", "id"];

/// Lowercase hex MD5 of the address, the backend's lookup key.
pub fn mailbox_key(address: &str) -> String {
    hex::encode(Md5::digest(address.as_bytes()))
}

pub struct TempMailOrgProvider {
    http: reqwest::Client,
    base_url: String,
    fallback_domains: Vec<String>,
}

impl TempMailOrgProvider {
    pub fn new(http: reqwest::Client, config: &TempMailOrgConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            fallback_domains: config.fallback_domains.clone(),
        }
    }

    /// Domains from discovery. An answer with nothing usable in it degrades to
    /// the configured fallback list; an unreachable backend does not.
    async fn discover_domains(&self) -> MailResult<Vec<String>> {
        let response = self
            .http
            .get(join_url(&self.base_url, "request/domains/format/json/"))
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(KIND, e))?;

        let discovered: Vec<String> = if status.is_success() {
            parse_json(&body)
                .as_ref()
                .and_then(Value::as_array)
                .map(|domains| {
                    domains
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|d| d.trim().trim_start_matches('@').to_string())
                        .filter(|d| !d.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        if !discovered.is_empty() {
            return Ok(discovered);
        }

        let reason = format!("domain discovery gave nothing usable (HTTP {status})");
        if self.fallback_domains.is_empty() {
            return Err(MailError::unavailable(KIND, reason));
        }
        warn!(
            provider = %KIND,
            %reason,
            fallback = ?self.fallback_domains,
            "degrading to configured fallback domains"
        );
        Ok(self.fallback_domains.clone())
    }

    async fn fetch_items(&self, mailbox: &Mailbox) -> MailResult<Vec<Value>> {
        let path = format!("request/mail/id/{}/format/json/", mailbox_key(&mailbox.address));
        let response = self
            .http
            .get(join_url(&self.base_url, &path))
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))?;

        Ok(match lenient_json(KIND, "listing", response).await? {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }
}

fn item_id(item: &Value) -> Option<String> {
    ID_FIELDS.iter().find_map(|key| id_text(item.get(*key)))
}

fn item_content(item: &Value) -> String {
    join_content(
        &first_fragment(item, TEXT_FIELDS),
        &first_fragment(item, MARKUP_FIELDS),
    )
}

#[async_trait]
impl MailProvider for TempMailOrgProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn create_mailbox(&self) -> MailResult<Mailbox> {
        let domains = self.discover_domains().await?;
        let domain = domains
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| MailError::unavailable(KIND, "no domains"))?;
        let address = format!("{}@{}", random_string(UNAMBIGUOUS_ALPHABET, 10), domain);

        info!(%address, "created temp-mail.org mailbox");
        Ok(Mailbox::new(KIND, address, None))
    }

    async fn list_messages(&self, mailbox: &Mailbox) -> MailResult<Vec<Message>> {
        let items = self.fetch_items(mailbox).await?;
        Ok(items
            .iter()
            .filter_map(|item| Some(Message::new(item_id(item)?, item_content(item))))
            .collect())
    }

    /// The backend has no per-message endpoint, so this re-lists and picks
    /// the matching entry.
    async fn read_message(&self, mailbox: &Mailbox, id: &str) -> MailResult<String> {
        let items = self.fetch_items(mailbox).await?;
        items
            .iter()
            .find(|item| item_id(item).as_deref() == Some(id))
            .map(item_content)
            .ok_or_else(|| MailError::not_found(KIND, id))
    }
}
