use thiserror::Error;

use crate::types::ProviderKind;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("{provider} unavailable: {reason}")]
    ProviderUnavailable {
        provider: ProviderKind,
        reason: String,
    },

    #[error("message {id} not found on {provider}")]
    MessageNotFound { provider: ProviderKind, id: String },

    #[error("no activation link after {0}s")]
    Timeout(u64),

    #[error("every mailbox provider failed")]
    FatalExhaustion,

    #[error("no mailbox has been created yet")]
    NoMailbox,

    #[error("mailbox {0} is already active for this session")]
    SessionActive(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MailError {
    pub fn unavailable(provider: ProviderKind, reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            reason: reason.into(),
        }
    }

    pub fn not_found(provider: ProviderKind, id: impl Into<String>) -> Self {
        Self::MessageNotFound {
            provider,
            id: id.into(),
        }
    }

    /// Whether creation should move on to the next provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. })
    }
}

pub type MailResult<T> = Result<T, MailError>;
