use anyhow::Result;
use inboxwatch_core::AppConfig;
use inboxwatch_storage::ResultLog;

pub async fn run(config: AppConfig) -> Result<()> {
    let log = ResultLog::new(&config.general.result_log);
    let records = log.records().await?;

    if records.is_empty() {
        println!("No activation links recorded in {}", log.path().display());
        return Ok(());
    }

    println!("{} activation link(s):\n", records.len());
    for r in records {
        println!("  {} -> {}", r.address, r.url);
    }

    Ok(())
}
