use anyhow::Result;
use inboxwatch_core::AppConfig;
use inboxwatch_providers::MailboxService;

/// Create command - run the provider chain once and report which backend answered
pub async fn run(config: AppConfig) -> Result<()> {
    let mut service = MailboxService::from_config(&config)?;
    let address = service.create().await?;

    let provider = service.provider().map(|p| p.as_str()).unwrap_or("none");
    println!("{address}");
    eprintln!("provider: {provider}");

    Ok(())
}
