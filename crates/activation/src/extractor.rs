/// Activation link extraction from raw message content
use inboxwatch_core::MailError;
use regex::Regex;

/// Punctuation that tends to cling to the end of a link in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ')', ';'];

/// Finds the first `<prefix>?<query>` link in a message. The prefix is a
/// literal, matched case-sensitively; the query runs until whitespace, an
/// angle bracket or a quote.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    pub fn new(prefix: &str) -> Result<Self, MailError> {
        let pattern = Regex::new(&format!(r#"{}\?[^\s"'<>]+"#, regex::escape(prefix)))
            .map_err(|e| MailError::Config(format!("link prefix {prefix}: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn find_activation_link(&self, content: &str) -> Option<String> {
        self.pattern
            .find(content)
            .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION).to_string())
    }
}
