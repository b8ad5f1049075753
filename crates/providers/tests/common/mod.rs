#![allow(dead_code)]

use inboxwatch_core::config::HttpConfig;
use inboxwatch_core::AppConfig;

pub fn http_client() -> reqwest::Client {
    inboxwatch_providers::http::build_client(&HttpConfig::default()).unwrap()
}

/// Every provider pointed at the same mock server.
pub fn mock_config(server_uri: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.mail_tm.base_url = server_uri.to_string();
    config.providers.temp_mail_org.base_url = server_uri.to_string();
    config.providers.maildrop.base_url = server_uri.to_string();
    config
}
