use url::Url;

/// Inline error shown for non-empty input that is not an http(s) URL.
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL starting with http:// or https://";

/// Result of checking free text typed into the URL box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UrlCheck {
    /// Nothing but whitespace. Invalid, but no error is shown.
    #[default]
    Empty,
    Valid(Url),
    Invalid,
}

impl UrlCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, UrlCheck::Valid(_))
    }

    pub fn url(&self) -> Option<&Url> {
        match self {
            UrlCheck::Valid(url) => Some(url),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            UrlCheck::Invalid => Some(INVALID_URL_MESSAGE),
            UrlCheck::Empty | UrlCheck::Valid(_) => None,
        }
    }
}

/// Syntactic check only; never touches the network.
pub fn check_url(input: &str) -> UrlCheck {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return UrlCheck::Empty;
    }
    match Url::parse(trimmed) {
        Ok(url)
            if matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty()) =>
        {
            UrlCheck::Valid(url)
        }
        _ => UrlCheck::Invalid,
    }
}

pub fn is_valid_url(input: &str) -> bool {
    check_url(input).is_valid()
}

/// Host name for labels, or the trimmed input when it does not parse.
pub fn domain_of(url: &str) -> String {
    let trimmed = url.trim();
    Url::parse(trimmed)
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{check_url, domain_of, UrlCheck};

    #[test]
    fn whitespace_is_empty_not_invalid() {
        assert_eq!(check_url("   \t"), UrlCheck::Empty);
        assert_eq!(check_url("   ").error_message(), None);
    }

    #[test]
    fn domain_falls_back_to_raw_text() {
        assert_eq!(domain_of("https://docs.example.com/a?b=c"), "docs.example.com");
        assert_eq!(domain_of(" not a url "), "not a url");
    }
}
