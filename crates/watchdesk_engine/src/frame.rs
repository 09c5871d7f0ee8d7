use desk_logging::desk_debug;
use reqwest::header::{HeaderMap, CONTENT_SECURITY_POLICY, X_FRAME_OPTIONS};
use watchdesk_core::FrameVerdict;

use crate::types::{map_reqwest_error, ApiError};
use crate::ClientSettings;

/// Decides whether a page would agree to be shown inside a frame.
#[async_trait::async_trait]
pub trait FrameProbe: Send + Sync {
    async fn probe(&self, url: &str) -> FrameVerdict;
}

#[derive(Debug, Clone)]
pub struct HttpFrameProbe {
    client: reqwest::Client,
}

impl HttpFrameProbe {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.probe_timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FrameProbe for HttpFrameProbe {
    async fn probe(&self, url: &str) -> FrameVerdict {
        desk_debug!("Probing {url} for framing headers");
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => verdict_from_headers(response.headers()),
            Ok(response) => refused(format!("the page answered {}", response.status())),
            Err(err) if err.is_timeout() => refused("the page took too long to answer"),
            Err(err) => refused(format!("the page could not be loaded: {err}")),
        }
    }
}

fn refused(reason: impl Into<String>) -> FrameVerdict {
    FrameVerdict::Refused {
        reason: reason.into(),
    }
}

/// `X-Frame-Options` DENY/SAMEORIGIN, or a CSP `frame-ancestors` without `*`,
/// refuse embedding.
pub fn verdict_from_headers(headers: &HeaderMap) -> FrameVerdict {
    if let Some(value) = headers.get(X_FRAME_OPTIONS).and_then(|v| v.to_str().ok()) {
        let value = value.trim().to_ascii_uppercase();
        if value == "DENY" || value == "SAMEORIGIN" {
            return refused(format!("X-Frame-Options: {value}"));
        }
    }

    for policy in headers
        .get_all(CONTENT_SECURITY_POLICY)
        .iter()
        .filter_map(|v| v.to_str().ok())
    {
        let ancestors = policy.split(';').find_map(|directive| {
            let mut parts = directive.split_whitespace();
            let name = parts.next()?;
            name.eq_ignore_ascii_case("frame-ancestors")
                .then(|| parts.collect::<Vec<_>>())
        });
        if let Some(sources) = ancestors {
            if !sources.contains(&"*") {
                return refused(format!(
                    "Content-Security-Policy: frame-ancestors {}",
                    sources.join(" ")
                ));
            }
        }
    }

    FrameVerdict::Embeddable
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_SECURITY_POLICY, X_FRAME_OPTIONS};
    use watchdesk_core::FrameVerdict;

    use super::verdict_from_headers;

    fn headers(pairs: &[(reqwest::header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn plain_pages_embed() {
        assert_eq!(verdict_from_headers(&HeaderMap::new()), FrameVerdict::Embeddable);
        assert_eq!(
            verdict_from_headers(&headers(&[(X_FRAME_OPTIONS, "ALLOW-FROM https://a.example")])),
            FrameVerdict::Embeddable
        );
    }

    #[test]
    fn frame_options_refuse() {
        assert!(matches!(
            verdict_from_headers(&headers(&[(X_FRAME_OPTIONS, "sameorigin")])),
            FrameVerdict::Refused { .. }
        ));
    }

    #[test]
    fn frame_ancestors_need_wildcard() {
        assert!(matches!(
            verdict_from_headers(&headers(&[(
                CONTENT_SECURITY_POLICY,
                "default-src 'self'; frame-ancestors 'self' https://a.example"
            )])),
            FrameVerdict::Refused { .. }
        ));
        assert_eq!(
            verdict_from_headers(&headers(&[(CONTENT_SECURITY_POLICY, "frame-ancestors *")])),
            FrameVerdict::Embeddable
        );
        assert_eq!(
            verdict_from_headers(&headers(&[(CONTENT_SECURITY_POLICY, "default-src 'self'")])),
            FrameVerdict::Embeddable
        );
    }

    #[test]
    fn frame_ancestors_name_is_case_insensitive() {
        assert!(matches!(
            verdict_from_headers(&headers(&[(CONTENT_SECURITY_POLICY, "Frame-Ancestors 'none'")])),
            FrameVerdict::Refused { .. }
        ));
        assert_eq!(
            verdict_from_headers(&headers(&[(
                CONTENT_SECURITY_POLICY,
                "frame-ancestorsfoo 'none'"
            )])),
            FrameVerdict::Embeddable
        );
    }
}
