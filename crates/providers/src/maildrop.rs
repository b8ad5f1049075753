/// Graph-query backend. Addresses are minted locally, so creation cannot fail.
use async_trait::async_trait;
use inboxwatch_core::config::MaildropConfig;
use inboxwatch_core::error::{MailError, MailResult};
use inboxwatch_core::{MailProvider, Mailbox, Message, ProviderKind};
use serde_json::{json, Value};
use tracing::info;

use crate::http::{
    first_fragment, fragment_text, id_text, join_content, join_url, lenient_json,
    random_string, transport_error, UNAMBIGUOUS_ALPHABET,
};

const KIND: ProviderKind = ProviderKind::Maildrop;

pub struct MaildropProvider {
    http: reqwest::Client,
    base_url: String,
    domain: String,
}

/// Quoted, escaped string literal for embedding in a query.
fn quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

pub fn inbox_query(mailbox: &str) -> String {
    format!(
        "query GetInbox {{ inbox(mailbox: {}) {{ id headerFrom subject date }} }}",
        quoted(mailbox)
    )
}

pub fn message_query(mailbox: &str, id: &str) -> String {
    format!(
        "query GetMessage {{ message(mailbox: {}, id: {}) {{ data html }} }}",
        quoted(mailbox),
        quoted(id)
    )
}

impl MaildropProvider {
    pub fn new(http: reqwest::Client, config: &MaildropConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            domain: config.domain.clone(),
        }
    }

    async fn send_query(&self, query: String) -> MailResult<reqwest::Response> {
        self.http
            .post(join_url(&self.base_url, "graphql"))
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))
    }
}

#[async_trait]
impl MailProvider for MaildropProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn create_mailbox(&self) -> MailResult<Mailbox> {
        let address = format!("{}@{}", random_string(UNAMBIGUOUS_ALPHABET, 12), self.domain);
        info!(%address, "created maildrop mailbox");
        Ok(Mailbox::new(KIND, address, None))
    }

    async fn list_messages(&self, mailbox: &Mailbox) -> MailResult<Vec<Message>> {
        let response = self.send_query(inbox_query(mailbox.local_part())).await?;
        let Some(reply) = lenient_json(KIND, "listing", response).await? else {
            return Ok(Vec::new());
        };

        let messages = reply
            .pointer("/data/inbox")
            .and_then(Value::as_array)
            .map(|inbox| {
                inbox
                    .iter()
                    .filter_map(|m| {
                        let id = id_text(m.get("id"))?;
                        Some(Message::new(id, first_fragment(m, &["subject"])))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(messages)
    }

    async fn read_message(&self, mailbox: &Mailbox, id: &str) -> MailResult<String> {
        let response = self.send_query(message_query(mailbox.local_part(), id)).await?;
        let Some(reply) = lenient_json(KIND, "message", response).await? else {
            return Ok(join_content("", ""));
        };
        match reply.pointer("/data/message") {
            Some(message) if message.is_object() => Ok(join_content(
                &fragment_text(message.get("data")),
                &fragment_text(message.get("html")),
            )),
            _ => Err(MailError::not_found(KIND, id)),
        }
    }
}
