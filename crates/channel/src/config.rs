//! Channel configuration, resolved at startup.

use crate::backoff::BackoffPolicy;
use crate::{ChannelError, ChannelResult};
use notify_core::SessionCredential;
use std::time::Duration;
use url::Url;

/// Default notification channel endpoint.
pub const DEFAULT_CHANNEL_URL: &str = "ws://localhost:8000/admin/ws/notifications";

/// Query parameter carrying the session credential.
pub const TOKEN_QUERY_PARAM: &str = "token";

const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    url: Url,
    backoff: BackoffPolicy,
    ping_interval: Duration,
    event_buffer: usize,
}

impl ChannelConfig {
    /// Validates `url` and applies the default backoff, keep-alive and buffering.
    pub fn new(url: &str) -> ChannelResult<Self> {
        let parsed = Url::parse(url).map_err(|source| ChannelError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(ChannelError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            url: parsed,
            backoff: BackoffPolicy::default(),
            ping_interval: DEFAULT_PING_INTERVAL,
            event_buffer: DEFAULT_EVENT_BUFFER,
        })
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_ping_interval(mut self, interval: Duration) -> ChannelResult<Self> {
        if interval.is_zero() {
            return Err(ChannelError::InvalidSetting(
                "ping interval must be non-zero".into(),
            ));
        }
        self.ping_interval = interval;
        Ok(self)
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> ChannelResult<Self> {
        if capacity == 0 {
            return Err(ChannelError::InvalidSetting(
                "event buffer must hold at least one event".into(),
            ));
        }
        self.event_buffer = capacity;
        Ok(self)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    pub fn ping_interval(&self) -> Duration {
        self.ping_interval
    }

    pub fn event_buffer(&self) -> usize {
        self.event_buffer
    }

    /// The endpoint for one session, with the credential appended as a query parameter.
    ///
    /// Any `token` already present on the configured url is replaced.
    pub fn endpoint_for(&self, credential: &SessionCredential) -> Url {
        let mut url = self.url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != TOKEN_QUERY_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(TOKEN_QUERY_PARAM, credential.expose());
        url
    }
}

/// Resolve the channel url from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_CHANNEL_URL`].
pub fn channel_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CHANNEL_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(token: &str) -> SessionCredential {
        SessionCredential::new(token).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = ChannelConfig::new(DEFAULT_CHANNEL_URL).unwrap();
        assert_eq!(cfg.url().as_str(), DEFAULT_CHANNEL_URL);
        assert_eq!(cfg.ping_interval(), Duration::from_secs(30));
        assert_eq!(cfg.event_buffer(), 256);
        assert_eq!(cfg.backoff(), BackoffPolicy::default());
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            ChannelConfig::new("not a url"),
            Err(ChannelError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ChannelConfig::new("http://localhost:8000/admin/ws/notifications"),
            Err(ChannelError::UnsupportedScheme(s)) if s == "http"
        ));
    }

    #[test]
    fn test_accepts_secure_endpoint() {
        let cfg = ChannelConfig::new("wss://admin.example.com/admin/ws/notifications").unwrap();
        let url = cfg.endpoint_for(&credential("t"));

        assert_eq!(url.scheme(), "wss");
        assert_eq!(url.as_str(), "wss://admin.example.com/admin/ws/notifications?token=t");
    }

    #[test]
    fn test_rejects_zero_settings() {
        let cfg = ChannelConfig::new(DEFAULT_CHANNEL_URL).unwrap();
        assert!(cfg.clone().with_ping_interval(Duration::ZERO).is_err());
        assert!(cfg.with_event_buffer(0).is_err());
    }

    #[test]
    fn test_endpoint_encodes_token() {
        let cfg = ChannelConfig::new("ws://example.test:9000/admin/ws/notifications").unwrap();
        let url = cfg.endpoint_for(&credential("a b&c=d"));

        assert_eq!(url.path(), "/admin/ws/notifications");
        assert_eq!(url.query(), Some("token=a+b%26c%3Dd"));
        let token = url
            .query_pairs()
            .find(|(k, _)| k == TOKEN_QUERY_PARAM)
            .map(|(_, v)| v.into_owned());
        assert_eq!(token.as_deref(), Some("a b&c=d"));
    }

    #[test]
    fn test_endpoint_replaces_existing_token_and_keeps_other_params() {
        let cfg = ChannelConfig::new("ws://example.test/ws?token=old&region=eu").unwrap();
        let url = cfg.endpoint_for(&credential("new"));

        assert_eq!(url.query(), Some("region=eu&token=new"));
    }

    #[test]
    fn test_channel_url_from_env_value() {
        assert_eq!(channel_url_from_env_value(None), DEFAULT_CHANNEL_URL);
        assert_eq!(channel_url_from_env_value(Some(" ".into())), DEFAULT_CHANNEL_URL);
        assert_eq!(
            channel_url_from_env_value(Some(" ws://h/ws ".into())),
            "ws://h/ws"
        );
    }
}
