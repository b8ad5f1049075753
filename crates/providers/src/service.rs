use async_trait::async_trait;
use inboxwatch_core::error::{MailError, MailResult};
use inboxwatch_core::{AppConfig, Inbox, MailProvider, Mailbox, Message, ProviderKind};
use tracing::{error, info, warn};

use crate::http::build_client;
use crate::{MailTmProvider, MaildropProvider, TempMailOrgProvider};

enum SessionState {
    Uninitialized,
    Creating,
    Active {
        provider: Box<dyn MailProvider>,
        mailbox: Mailbox,
    },
    Exhausted,
}

/// Owns the provider fallback chain and, once a mailbox exists, the single
/// adapter that serves it. There is no way back to an uninitialized state.
pub struct MailboxService {
    candidates: Vec<Box<dyn MailProvider>>,
    state: SessionState,
}

impl MailboxService {
    /// Providers are attempted in the order given.
    pub fn new(candidates: Vec<Box<dyn MailProvider>>) -> Self {
        Self {
            candidates,
            state: SessionState::Uninitialized,
        }
    }

    /// The standard chain, one adapter per kind in `ProviderKind::PRIORITY`.
    pub fn from_config(config: &AppConfig) -> MailResult<Self> {
        let http = build_client(&config.http)?;
        let providers = &config.providers;
        let chain = ProviderKind::PRIORITY
            .iter()
            .map(|kind| -> Box<dyn MailProvider> {
                match kind {
                    ProviderKind::MailTm => {
                        Box::new(MailTmProvider::new(http.clone(), &providers.mail_tm))
                    }
                    ProviderKind::TempMailOrg => Box::new(TempMailOrgProvider::new(
                        http.clone(),
                        &providers.temp_mail_org,
                    )),
                    ProviderKind::Maildrop => {
                        Box::new(MaildropProvider::new(http.clone(), &providers.maildrop))
                    }
                }
            })
            .collect();
        Ok(Self::new(chain))
    }

    pub async fn create(&mut self) -> MailResult<String> {
        match &self.state {
            SessionState::Active { mailbox, .. } => {
                return Err(MailError::SessionActive(mailbox.address.clone()))
            }
            SessionState::Exhausted => return Err(MailError::FatalExhaustion),
            SessionState::Uninitialized | SessionState::Creating => {}
        }

        self.state = SessionState::Creating;
        let candidates = std::mem::take(&mut self.candidates);

        for provider in candidates {
            let kind = provider.kind();
            match provider.create_mailbox().await {
                Ok(mailbox) => {
                    info!(provider = %kind, address = %mailbox.address, "mailbox active");
                    let address = mailbox.address.clone();
                    self.state = SessionState::Active { provider, mailbox };
                    return Ok(address);
                }
                Err(e) if e.is_provider_failure() => {
                    warn!(provider = %kind, error = %e, "mailbox creation failed, trying next provider");
                }
                Err(e) => {
                    error!(provider = %kind, error = %e, "mailbox creation aborted");
                    self.state = SessionState::Exhausted;
                    return Err(e);
                }
            }
        }

        error!("all mailbox providers failed");
        self.state = SessionState::Exhausted;
        Err(MailError::FatalExhaustion)
    }

    pub fn mailbox(&self) -> Option<&Mailbox> {
        match &self.state {
            SessionState::Active { mailbox, .. } => Some(mailbox),
            _ => None,
        }
    }

    pub fn provider(&self) -> Option<ProviderKind> {
        self.mailbox().map(|m| m.provider)
    }

    fn active(&self) -> MailResult<(&dyn MailProvider, &Mailbox)> {
        match &self.state {
            SessionState::Active { provider, mailbox } => Ok((provider.as_ref(), mailbox)),
            _ => Err(MailError::NoMailbox),
        }
    }

    pub async fn list_messages(&self) -> MailResult<Vec<Message>> {
        let (provider, mailbox) = self.active()?;
        provider.list_messages(mailbox).await
    }

    pub async fn read_message(&self, id: &str) -> MailResult<String> {
        let (provider, mailbox) = self.active()?;
        provider.read_message(mailbox, id).await
    }
}

#[async_trait]
impl Inbox for MailboxService {
    fn provider_name(&self) -> &str {
        self.provider().map(|p| p.as_str()).unwrap_or("none")
    }

    async fn list_messages(&self) -> MailResult<Vec<Message>> {
        MailboxService::list_messages(self).await
    }

    async fn read_message(&self, id: &str) -> MailResult<String> {
        MailboxService::read_message(self, id).await
    }
}
