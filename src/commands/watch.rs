use anyhow::Result;
use inboxwatch_activation::{ActivationPoller, LinkExtractor, PollSettings};
use inboxwatch_core::AppConfig;
use inboxwatch_providers::MailboxService;
use inboxwatch_storage::ResultLog;
use std::time::Duration;
use tracing::info;

/// Watch command - one full run: mailbox, activation email, result record
pub async fn run(
    config: AppConfig,
    deadline: Option<u64>,
    interval: Option<u64>,
    no_save: bool,
) -> Result<()> {
    let mut settings = PollSettings::from(&config.activation);
    if let Some(secs) = deadline {
        settings.deadline = Duration::from_secs(secs);
    }
    if let Some(secs) = interval.filter(|&s| s > 0) {
        settings.interval = Duration::from_secs(secs);
    }

    let extractor = LinkExtractor::new(&config.activation.link_prefix)?;
    let poller = ActivationPoller::new(extractor, settings);

    let mut service = MailboxService::from_config(&config)?;
    let address = service.create().await?;

    // The address goes to stdout so whoever drives the signup form can pick it up.
    println!("{address}");
    info!(%address, "submit this address, waiting for the activation email");

    let link = poller.poll_for_link(&service).await?;
    println!("{}", link.url);

    if !no_save {
        ResultLog::new(&config.general.result_log)
            .append(&address, &link)
            .await?;
    }

    Ok(())
}
