/// Bounded polling of a mailbox until an activation link shows up
use inboxwatch_core::config::ActivationConfig;
use inboxwatch_core::error::{MailError, MailResult};
use inboxwatch_core::{ActivationLink, Inbox, Message};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::extractor::LinkExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub deadline: Duration,
    pub interval: Duration,
}

impl From<&ActivationConfig> for PollSettings {
    fn from(config: &ActivationConfig) -> Self {
        Self {
            deadline: config.deadline(),
            interval: config.poll_interval(),
        }
    }
}

pub struct ActivationPoller {
    extractor: LinkExtractor,
    settings: PollSettings,
}

impl ActivationPoller {
    pub fn new(extractor: LinkExtractor, settings: PollSettings) -> Self {
        Self {
            extractor,
            settings,
        }
    }

    /// Lists, reads and scans until a link turns up or the deadline passes.
    ///
    /// Messages are read in listing order and the first one yielding a link
    /// wins; nothing after it is read. Elapsed time comes from the tokio
    /// clock, so a paused runtime fast-forwards the whole loop.
    pub async fn poll_for_link(&self, inbox: &dyn Inbox) -> MailResult<ActivationLink> {
        let PollSettings { deadline, interval } = self.settings;
        let start = Instant::now();
        let mut tick: u32 = 0;

        info!(
            provider = inbox.provider_name(),
            deadline_secs = deadline.as_secs(),
            "polling for activation email"
        );

        while start.elapsed() < deadline {
            tick += 1;
            let messages = inbox.list_messages().await?;
            debug!(
                provider = inbox.provider_name(),
                tick,
                count = messages.len(),
                listing = %dump(&messages),
                "inbox listing"
            );

            if let Some(url) = self.scan(inbox, &messages).await? {
                info!(%url, tick, "activation link found");
                return Ok(ActivationLink::new(url));
            }

            let remaining = deadline.saturating_sub(start.elapsed());
            tokio::time::sleep(interval.min(remaining)).await;
        }

        warn!(
            provider = inbox.provider_name(),
            ticks = tick,
            "activation email not received before deadline"
        );
        Err(MailError::Timeout(deadline.as_secs()))
    }

    async fn scan(&self, inbox: &dyn Inbox, messages: &[Message]) -> MailResult<Option<String>> {
        for message in messages {
            let content = match inbox.read_message(&message.id).await {
                Ok(content) => content,
                Err(e @ MailError::MessageNotFound { .. }) => {
                    warn!(id = %message.id, error = %e, "listed message vanished, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(url) = self.extractor.find_activation_link(&content) {
                return Ok(Some(url));
            }
        }
        Ok(None)
    }
}

fn dump(messages: &[Message]) -> String {
    serde_json::to_string_pretty(messages).unwrap_or_default()
}
