use anyhow::{bail, Result};
use inboxwatch_activation::LinkExtractor;
use inboxwatch_core::AppConfig;

/// Extract command - run the link extractor over a saved message
pub async fn run(config: AppConfig, file: String, prefix: Option<String>) -> Result<()> {
    let content = tokio::fs::read_to_string(&file).await?;
    let prefix = prefix.unwrap_or(config.activation.link_prefix);
    let extractor = LinkExtractor::new(&prefix)?;

    match extractor.find_activation_link(&content) {
        Some(url) => {
            println!("{url}");
            Ok(())
        }
        None => bail!("no link starting with {prefix} in {file}"),
    }
}
