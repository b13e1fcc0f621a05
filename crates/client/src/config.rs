//! Configuration types for the Odoo client.

use std::time::Duration;
use url::Url;

/// Path of the authentication endpoint, relative to the base URL.
pub const COMMON_ENDPOINT: &str = "xmlrpc/2/common";

/// Path of the model method endpoint, relative to the base URL.
pub const OBJECT_ENDPOINT: &str = "xmlrpc/2/object";

/// Connection settings for an Odoo instance.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Odoo server. Always ends with `/`.
    pub base_url: Url,
    /// Database name.
    pub database: String,
    /// Login of the user the API key belongs to.
    pub username: String,
    /// API key (or password) used for every call.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration, normalizing the base URL.
    pub fn new(
        base_url: Url,
        database: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            database: database.into(),
            username: username.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// URL of the authentication endpoint.
    pub fn common_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(COMMON_ENDPOINT)
    }

    /// URL of the model method endpoint.
    pub fn object_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(OBJECT_ENDPOINT)
    }
}

// The API key never ends up in logs through `{:?}`.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("database", &self.database)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Make sure the path ends with a slash so endpoint joins keep any prefix.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::new(Url::parse(base).unwrap(), "db", "admin", "secret")
    }

    #[test]
    fn test_endpoint_urls() {
        let config = config("https://acme.odoo.com");

        assert_eq!(
            config.common_url().unwrap().as_str(),
            "https://acme.odoo.com/xmlrpc/2/common"
        );
        assert_eq!(
            config.object_url().unwrap().as_str(),
            "https://acme.odoo.com/xmlrpc/2/object"
        );
    }

    #[test]
    fn test_endpoint_urls_keep_path_prefix() {
        let config = config("http://localhost:8069/erp");

        assert_eq!(
            config.common_url().unwrap().as_str(),
            "http://localhost:8069/erp/xmlrpc/2/common"
        );
    }

    #[test]
    fn test_trailing_slash_is_not_doubled() {
        let config = config("http://localhost:8069/");
        assert_eq!(config.base_url.as_str(), "http://localhost:8069/");
    }

    #[test]
    fn test_defaults() {
        let config = config("http://localhost:8069");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.database, "db");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", config("http://localhost:8069"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
