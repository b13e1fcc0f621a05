//! Main client for the Odoo XML-RPC API.

use crate::api::*;
use crate::config::ClientConfig;
use crate::error::{OdooError, OdooResult};
use crate::transport::{Endpoint, HttpTransport};
use reqwest::Certificate;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};
use url::Url;

/// Login state shared by every call made through a client.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Pending,
    Authenticated(i64),
    /// Credentials were rejected; stays rejected until the process restarts.
    Rejected(String),
}

/// Client for a single Odoo database.
#[derive(Clone)]
pub struct OdooClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
    session: Arc<Mutex<SessionState>>,
}

impl OdooClient {
    /// Create a new client builder.
    pub fn builder() -> OdooClientBuilder {
        OdooClientBuilder::new()
    }

    fn from_config(config: ClientConfig, certificates: Vec<Certificate>) -> OdooResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::with_root_certificates(config.clone(), certificates)?;

        Ok(Self {
            config,
            http,
            session: Arc::new(Mutex::new(SessionState::Pending)),
        })
    }

    /// Connection settings of this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Server version information (`common.version`). Needs no login.
    pub async fn version(&self) -> OdooResult<Value> {
        self.http.call(Endpoint::Common, "version", &[]).await
    }

    /// User id of the session, logging in on first use.
    pub async fn uid(&self) -> OdooResult<i64> {
        let mut session = self.session.lock().await;
        match &*session {
            SessionState::Authenticated(uid) => return Ok(*uid),
            SessionState::Rejected(reason) => {
                return Err(OdooError::Authentication(reason.clone()))
            }
            SessionState::Pending => {}
        }

        let params = [
            json!(self.config.database),
            json!(self.config.username),
            json!(self.config.api_key),
            json!({}),
        ];
        let reason = match self.http.call(Endpoint::Common, "authenticate", &params).await {
            Ok(Value::Number(n)) if n.as_i64().is_some_and(|uid| uid > 0) => {
                let uid = n.as_i64().unwrap_or_default();
                info!(uid = uid, url = %self.config.base_url, "Authenticated with Odoo");
                *session = SessionState::Authenticated(uid);
                return Ok(uid);
            }
            Ok(_) => format!(
                "credentials rejected for {}@{} (database '{}')",
                self.config.username, self.config.base_url, self.config.database
            ),
            Err(OdooError::Fault { message, .. }) => format!(
                "login of {}@{} failed: {}",
                self.config.username, self.config.base_url, message
            ),
            // Transport failures do not poison the session.
            Err(other) => return Err(other),
        };

        error!(reason = %reason, "Odoo authentication failed; restart with valid credentials");
        *session = SessionState::Rejected(reason.clone());
        Err(OdooError::Authentication(reason))
    }

    /// Call `execute_kw` on the object endpoint.
    pub async fn execute(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> OdooResult<Value> {
        let uid = self.uid().await?;
        let params = [
            json!(self.config.database),
            json!(uid),
            json!(self.config.api_key),
            json!(model),
            json!(method),
            Value::Array(args),
            Value::Object(kwargs),
        ];
        self.http.call(Endpoint::Object, "execute_kw", &params).await
    }

    /// Get the projects API.
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }

    /// Get the tasks API.
    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(self)
    }

    /// Get the tags API.
    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi::new(self)
    }

    /// Get the users API.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Get the milestones API.
    pub fn milestones(&self) -> MilestonesApi<'_> {
        MilestonesApi::new(self)
    }

    /// Get the generic records API.
    pub fn records(&self) -> RecordsApi<'_> {
        RecordsApi::new(self)
    }
}

/// Builder for creating an OdooClient.
pub struct OdooClientBuilder {
    base_url: Option<String>,
    database: Option<String>,
    username: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    ca_bundle: Option<PathBuf>,
}

impl OdooClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            database: None,
            username: None,
            api_key: None,
            timeout: Duration::from_secs(30),
            ca_bundle: None,
        }
    }

    /// Set the base URL of the Odoo server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the login.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Trust the certificates of a PEM bundle in addition to the built-in roots.
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> OdooResult<OdooClient> {
        let base_url = required(self.base_url, "base_url")?;
        let database = required(self.database, "database")?;
        let username = required(self.username, "username")?;
        let api_key = required(self.api_key, "api_key")?;

        let mut config = ClientConfig::new(Url::parse(&base_url)?, database, username, api_key);
        config.timeout = self.timeout;

        let certificates = match self.ca_bundle {
            Some(path) => load_ca_bundle(&path)?,
            None => Vec::new(),
        };

        OdooClient::from_config(config, certificates)
    }
}

impl Default for OdooClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required(value: Option<String>, name: &str) -> OdooResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| OdooError::Config(format!("{name} is required")))
}

fn load_ca_bundle(path: &std::path::Path) -> OdooResult<Vec<Certificate>> {
    let pem = std::fs::read(path).map_err(|e| {
        OdooError::Config(format!("Failed to read CA bundle {}: {e}", path.display()))
    })?;
    let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| {
        OdooError::Config(format!("Invalid CA bundle {}: {e}", path.display()))
    })?;
    if certificates.is_empty() {
        return Err(OdooError::Config(format!(
            "CA bundle {} contains no certificates",
            path.display()
        )));
    }
    Ok(certificates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_requires_fields() {
        let err = OdooClient::builder()
            .base_url("http://localhost:8069")
            .database("db")
            .username("admin")
            .build()
            .err()
            .unwrap();

        assert_eq!(err.to_string(), "Configuration error: api_key is required");
    }

    #[test]
    fn test_builder_rejects_blank_values() {
        let err = OdooClient::builder()
            .base_url("http://localhost:8069")
            .database("  ")
            .username("admin")
            .api_key("key")
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, OdooError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let err = OdooClient::builder()
            .base_url("not a url")
            .database("db")
            .username("admin")
            .api_key("key")
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, OdooError::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_sets_timeout() {
        let client = OdooClient::builder()
            .base_url("http://localhost:8069")
            .database("db")
            .username("admin")
            .api_key("key")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert_eq!(client.config().base_url.as_str(), "http://localhost:8069/");
    }

    #[test]
    fn test_missing_ca_bundle_is_config_error() {
        let err = OdooClient::builder()
            .base_url("https://acme.odoo.com")
            .database("db")
            .username("admin")
            .api_key("key")
            .ca_bundle("/nonexistent/bundle.pem")
            .build()
            .err()
            .unwrap();

        assert!(err.to_string().contains("Failed to read CA bundle"));
    }

    #[test]
    fn test_empty_ca_bundle_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();

        let err = OdooClient::builder()
            .base_url("https://acme.odoo.com")
            .database("db")
            .username("admin")
            .api_key("key")
            .ca_bundle(file.path())
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, OdooError::Config(_)));
    }
}
