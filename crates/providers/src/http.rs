/// Shared HTTP plumbing and response normalization for the mailbox backends
use inboxwatch_core::config::HttpConfig;
use inboxwatch_core::error::{MailError, MailResult};
use inboxwatch_core::ProviderKind;
use rand::Rng;
use serde_json::Value;
use tracing::warn;

/// Local-part alphabet without look-alike characters.
pub const UNAMBIGUOUS_ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";
pub const LOWER_ALNUM_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const ALNUM_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn build_client(config: &HttpConfig) -> MailResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout());

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| MailError::Config(format!("bad proxy {proxy_url}: {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| MailError::Config(format!("http client: {e}")))
}

pub fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub fn transport_error(provider: ProviderKind, err: reqwest::Error) -> MailError {
    MailError::unavailable(provider, err.to_string())
}

/// Malformed JSON is treated as absent rather than an error.
pub fn parse_json(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}

/// A text or markup field as one string: plain strings pass through, lists of
/// fragments are concatenated, anything else is empty.
pub fn fragment_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .concat(),
        _ => String::new(),
    }
}

/// First field among `keys` with non-empty text, or empty.
pub fn first_fragment(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| fragment_text(item.get(*key)))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

pub fn join_content(text: &str, markup: &str) -> String {
    format!("{text}\n{markup}")
}

/// Message ids arrive as strings on some backends and numbers on others.
pub fn id_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Applies the listing and read failure policy: a non-2xx with no body is a
/// protocol failure, a non-2xx with a body or an unparseable body is "nothing
/// yet" and the caller retries on its next poll.
pub async fn lenient_json(
    provider: ProviderKind,
    what: &str,
    response: reqwest::Response,
) -> MailResult<Option<Value>> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        if body.trim().is_empty() {
            return Err(MailError::unavailable(
                provider,
                format!("{what} returned HTTP {status} with no body"),
            ));
        }
        warn!(%provider, %status, what, "request failed, treating as empty");
        return Ok(None);
    }

    match parse_json(&body) {
        Some(value) => Ok(Some(value)),
        None => {
            warn!(%provider, what, "body is not JSON, treating as empty");
            Ok(None)
        }
    }
}
