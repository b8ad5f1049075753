/// Token-based backend: register an account, trade it for a bearer token
use async_trait::async_trait;
use inboxwatch_core::config::MailTmConfig;
use inboxwatch_core::error::{MailError, MailResult};
use inboxwatch_core::{Credential, MailProvider, Mailbox, Message, ProviderKind};
use rand::seq::SliceRandom;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::http::{
    first_fragment, fragment_text, id_text, join_content, join_url, lenient_json, parse_json,
    random_string, transport_error, ALNUM_ALPHABET, LOWER_ALNUM_ALPHABET,
};

const KIND: ProviderKind = ProviderKind::MailTm;

pub struct MailTmProvider {
    http: reqwest::Client,
    base_url: String,
}

impl MailTmProvider {
    pub fn new(http: reqwest::Client, config: &MailTmConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    async fn discover_domain(&self) -> MailResult<String> {
        let response = self
            .http
            .get(join_url(&self.base_url, "domains"))
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))?;

        let body = checked_body(response, "domains").await?;
        let domains: Vec<String> = parse_json(&body)
            .as_ref()
            .and_then(|v| v.get("hydra:member"))
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| m.get("domain").and_then(Value::as_str))
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        domains
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| MailError::unavailable(KIND, "no domains offered"))
    }

    async fn post_credentials(
        &self,
        path: &str,
        address: &str,
        password: &str,
    ) -> MailResult<String> {
        let response = self
            .http
            .post(join_url(&self.base_url, path))
            .json(&json!({ "address": address, "password": password }))
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))?;

        checked_body(response, path).await
    }
}

#[async_trait]
impl MailProvider for MailTmProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn create_mailbox(&self) -> MailResult<Mailbox> {
        let domain = self.discover_domain().await?;
        let address = format!("{}@{}", random_string(LOWER_ALNUM_ALPHABET, 10), domain);
        let password = random_string(ALNUM_ALPHABET, 16);

        self.post_credentials("accounts", &address, &password).await?;
        debug!(%address, "mail.tm account registered");

        let body = self.post_credentials("token", &address, &password).await?;
        let token = parse_json(&body)
            .as_ref()
            .and_then(|v| v.get("token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| MailError::unavailable(KIND, "token response carried no token"))?;

        info!(%address, "created mail.tm mailbox");
        Ok(Mailbox::new(KIND, address, Some(Credential::Token(token))))
    }

    async fn list_messages(&self, mailbox: &Mailbox) -> MailResult<Vec<Message>> {
        let token = mailbox
            .token()
            .ok_or_else(|| MailError::unavailable(KIND, "mailbox carries no bearer token"))?;

        let response = self
            .http
            .get(join_url(&self.base_url, "messages"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))?;

        let Some(listing) = lenient_json(KIND, "listing", response).await? else {
            return Ok(Vec::new());
        };

        let messages = listing
            .get("hydra:member")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| {
                        let id = id_text(m.get("id"))?;
                        Some(Message::new(id, first_fragment(m, &["intro", "subject"])))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(messages)
    }

    async fn read_message(&self, mailbox: &Mailbox, id: &str) -> MailResult<String> {
        let token = mailbox
            .token()
            .ok_or_else(|| MailError::unavailable(KIND, "mailbox carries no bearer token"))?;

        let response = self
            .http
            .get(join_url(&self.base_url, &format!("messages/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(KIND, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MailError::not_found(KIND, id));
        }
        let message = lenient_json(KIND, "message", response)
            .await?
            .unwrap_or(Value::Null);
        Ok(join_content(
            &fragment_text(message.get("text")),
            &fragment_text(message.get("html")),
        ))
    }
}

/// Body of a 2xx response; anything else fails the call.
async fn checked_body(response: reqwest::Response, what: &str) -> MailResult<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(MailError::unavailable(KIND, format!("{what}: HTTP {status}")));
    }
    response.text().await.map_err(|e| transport_error(KIND, e))
}
