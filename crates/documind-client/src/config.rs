use serde::{Deserialize, Serialize};

/// Connection settings handed over by the host page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    /// Sent as `X-API-Key` when set
    pub api_key: Option<String>,
    pub request_timeout_ms: u32,
    /// Timeout of the reachability probe
    pub health_timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            api_key: None,
            request_timeout_ms: 30_000,
            health_timeout_ms: 3_000,
        }
    }
}

impl ClientConfig {
    /// Parse host-supplied JSON; anything unparseable yields the defaults
    pub fn from_json_or_default(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_default()
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.request_timeout_ms, 30_000);
        assert_eq!(cfg.health_timeout_ms, 3_000);
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn test_from_json_partial_and_invalid() {
        let cfg = ClientConfig::from_json_or_default(r#"{"baseUrl":"https://api.example.com/"}"#);
        assert_eq!(cfg.base_url, "https://api.example.com/");
        assert_eq!(cfg.request_timeout_ms, 30_000);

        assert_eq!(ClientConfig::from_json_or_default("not json"), ClientConfig::default());
    }

    #[test]
    fn test_url_join() {
        let cfg = ClientConfig {
            base_url: "https://api.example.com/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.url("/documents"), "https://api.example.com/documents");
        assert_eq!(cfg.url("docs"), "https://api.example.com/docs");
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let cfg = ClientConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(cfg.api_key().is_none());
    }
}
