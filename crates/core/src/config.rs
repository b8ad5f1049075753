use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::MailError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub activation: ActivationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_result_log")]
    pub result_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub proxy: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub mail_tm: MailTmConfig,
    #[serde(default)]
    pub temp_mail_org: TempMailOrgConfig,
    #[serde(default)]
    pub maildrop: MaildropConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailTmConfig {
    #[serde(default = "default_mail_tm_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TempMailOrgConfig {
    #[serde(default = "default_temp_mail_org_url")]
    pub base_url: String,
    /// Used when domain discovery answers but gives nothing usable.
    /// Empty disables the degraded path.
    #[serde(default = "default_fallback_domains")]
    pub fallback_domains: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MaildropConfig {
    #[serde(default = "default_maildrop_url")]
    pub base_url: String,
    #[serde(default = "default_maildrop_domain")]
    pub domain: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivationConfig {
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,
    #[serde(default = "default_deadline")]
    pub deadline_seconds: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl AppConfig {
    pub fn from_toml(raw: &str) -> Result<Self, MailError> {
        let config: AppConfig =
            toml::from_str(raw).map_err(|e| MailError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MailError> {
        for base in [
            &self.providers.mail_tm.base_url,
            &self.providers.temp_mail_org.base_url,
            &self.providers.maildrop.base_url,
        ] {
            Url::parse(base).map_err(|e| MailError::Config(format!("bad base_url {base}: {e}")))?;
        }
        if self.providers.maildrop.domain.trim().is_empty() {
            return Err(MailError::Config("maildrop domain must not be empty".into()));
        }
        if self.activation.link_prefix.is_empty() {
            return Err(MailError::Config("activation link_prefix must not be empty".into()));
        }
        if self.activation.poll_interval_seconds == 0 {
            return Err(MailError::Config("poll_interval_seconds must be positive".into()));
        }
        Ok(())
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl ActivationConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            result_log: default_result_log(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            user_agent: default_user_agent(),
            proxy: None,
        }
    }
}

impl Default for MailTmConfig {
    fn default() -> Self {
        Self {
            base_url: default_mail_tm_url(),
        }
    }
}

impl Default for TempMailOrgConfig {
    fn default() -> Self {
        Self {
            base_url: default_temp_mail_org_url(),
            fallback_domains: default_fallback_domains(),
        }
    }
}

impl Default for MaildropConfig {
    fn default() -> Self {
        Self {
            base_url: default_maildrop_url(),
            domain: default_maildrop_domain(),
        }
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            link_prefix: default_link_prefix(),
            deadline_seconds: default_deadline(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_result_log() -> String { "activation_links.txt".into() }
fn default_request_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:131.0) Gecko/20100101 Firefox/131.0".into()
}
fn default_mail_tm_url() -> String { "https://api.mail.tm".into() }
fn default_temp_mail_org_url() -> String { "https://api.temp-mail.org".into() }
fn default_fallback_domains() -> Vec<String> {
    vec!["temp-mail.org".into(), "mailtemp.net".into()]
}
fn default_maildrop_url() -> String { "https://api.maildrop.cc".into() }
fn default_maildrop_domain() -> String { "maildrop.cc".into() }
fn default_link_prefix() -> String { "https://my.avira.com/en/auth/login".into() }
fn default_deadline() -> u64 { 300 }
fn default_poll_interval() -> u64 { 5 }
