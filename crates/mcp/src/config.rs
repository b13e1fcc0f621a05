//! Command line and environment configuration.

use crate::tools::{ModelAllowList, ToolPolicy};
use clap::{Args, Parser, Subcommand, ValueEnum};
use odoo_client::{OdooClient, OdooError};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "odoo-mcp")]
#[command(version, about = "MCP server for Odoo project management", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Check configuration and connectivity, then exit
    Doctor,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Connection and policy settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Odoo base URL, e.g. https://company.odoo.com
    #[arg(long, env = "ODOO_URL", global = true)]
    pub url: Option<String>,

    /// Database name
    #[arg(long, env = "ODOO_DB", global = true)]
    pub db: Option<String>,

    /// Login of the user the server acts as
    #[arg(long, env = "ODOO_USERNAME", global = true)]
    pub username: Option<String>,

    /// API key (or password)
    #[arg(long, env = "ODOO_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// PEM bundle of extra trusted root certificates
    #[arg(long, env = "ODOO_CA_BUNDLE", global = true)]
    pub ca_bundle: Option<PathBuf>,

    #[arg(long, env = "SSL_CERT_FILE", hide = true, global = true)]
    pub ssl_cert_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "ODOO_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout_secs: u64,

    /// Comma-separated models the generic record tools may touch
    #[arg(long, env = "ODOO_ALLOWED_MODELS", value_delimiter = ',', global = true)]
    pub allowed_models: Vec<String>,

    /// Expose read-only tools only
    #[arg(
        long,
        env = "ODOO_READ_ONLY",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new(),
        global = true
    )]
    pub read_only: bool,
}

impl ConnectionArgs {
    /// Names of required variables that are unset or blank.
    pub fn missing_variables(&self) -> Vec<&'static str> {
        [
            ("ODOO_URL", &self.url),
            ("ODOO_DB", &self.db),
            ("ODOO_USERNAME", &self.username),
            ("ODOO_API_KEY", &self.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// CA bundle path, preferring ODOO_CA_BUNDLE over SSL_CERT_FILE.
    pub fn ca_bundle_path(&self) -> Option<&PathBuf> {
        self.ca_bundle.as_ref().or(self.ssl_cert_file.as_ref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid ODOO_URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("CA bundle {} is not a readable file", .0.display())]
    CaBundle(PathBuf),

    #[error("failed to create Odoo client: {0}")]
    Client(#[from] OdooError),
}

/// Validated server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    pub url: String,
    pub database: String,
    pub username: String,
    pub api_key: String,
    pub ca_bundle: Option<PathBuf>,
    pub timeout: Duration,
    pub allowed_models: Vec<String>,
    pub read_only: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("ca_bundle", &self.ca_bundle)
            .field("timeout", &self.timeout)
            .field("allowed_models", &self.allowed_models)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl ServerConfig {
    /// Validate connection settings, reporting every missing variable at once.
    pub fn from_connection(args: &ConnectionArgs) -> Result<Self, ConfigError> {
        let missing = args.missing_variables();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let text = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();
        let url = text(&args.url);
        url::Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
            url: url.clone(),
            source,
        })?;

        let ca_bundle = args.ca_bundle_path().cloned();
        if let Some(path) = &ca_bundle {
            if !path.is_file() {
                return Err(ConfigError::CaBundle(path.clone()));
            }
        }

        let allowed_models = args
            .allowed_models
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        Ok(Self {
            url,
            database: text(&args.db),
            username: text(&args.username),
            api_key: text(&args.api_key),
            ca_bundle,
            timeout: Duration::from_secs(args.timeout_secs),
            allowed_models,
            read_only: args.read_only,
        })
    }

    /// Build the Odoo client. No network traffic happens here.
    pub fn connect(&self) -> Result<OdooClient, ConfigError> {
        let mut builder = OdooClient::builder()
            .base_url(&self.url)
            .database(&self.database)
            .username(&self.username)
            .api_key(&self.api_key)
            .timeout(self.timeout);
        if let Some(path) = &self.ca_bundle {
            builder = builder.ca_bundle(path);
        }
        Ok(builder.build()?)
    }

    pub fn policy(&self) -> ToolPolicy {
        let allowed_models = if self.allowed_models.is_empty() {
            ModelAllowList::any()
        } else {
            ModelAllowList::only(self.allowed_models.iter().cloned())
        };
        ToolPolicy {
            allowed_models,
            read_only: self.read_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ConnectionArgs {
        ConnectionArgs {
            url: Some("https://acme.odoo.com".into()),
            db: Some("acme".into()),
            username: Some("bot@acme.com".into()),
            api_key: Some("0123456789abcdef".into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ..Default::default()
        }
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "odoo-mcp",
            "doctor",
            "--url",
            "https://acme.odoo.com",
            "--db",
            "acme",
            "--allowed-models",
            "project.task,project.project",
            "--read-only",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Command::Doctor));
        assert_eq!(cli.connection.url.as_deref(), Some("https://acme.odoo.com"));
        assert_eq!(
            cli.connection.allowed_models,
            vec!["project.task".to_string(), "project.project".to_string()]
        );
        assert!(cli.connection.read_only);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["odoo-mcp", "--timeout-secs", "30"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.connection.timeout_secs, 30);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["odoo-mcp", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn test_missing_variables_lists_all() {
        let args = ConnectionArgs {
            url: Some("https://acme.odoo.com".into()),
            username: Some("  ".into()),
            ..Default::default()
        };

        assert_eq!(
            args.missing_variables(),
            vec!["ODOO_DB", "ODOO_USERNAME", "ODOO_API_KEY"]
        );

        let err = ServerConfig::from_connection(&args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required environment variables: ODOO_DB, ODOO_USERNAME, ODOO_API_KEY"
        );
    }

    #[test]
    fn test_invalid_url() {
        let args = ConnectionArgs {
            url: Some("acme.odoo.com".into()),
            ..complete()
        };
        assert!(matches!(
            ServerConfig::from_connection(&args),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_ca_bundle_must_exist() {
        let args = ConnectionArgs {
            ssl_cert_file: Some(PathBuf::from("/nonexistent/ca.pem")),
            ..complete()
        };
        assert!(matches!(
            ServerConfig::from_connection(&args),
            Err(ConfigError::CaBundle(_))
        ));
    }

    #[test]
    fn test_policy_and_connect() {
        let args = ConnectionArgs {
            allowed_models: vec![" project.task ".into(), "".into()],
            read_only: true,
            ..complete()
        };
        let config = ServerConfig::from_connection(&args).unwrap();

        assert_eq!(config.allowed_models, vec!["project.task".to_string()]);
        let policy = config.policy();
        assert!(policy.read_only);
        assert!(policy.allowed_models.check("project.task").is_ok());
        assert!(policy.allowed_models.check("res.partner").is_err());

        let client = config.connect().unwrap();
        assert_eq!(client.config().database, "acme");
        assert!(!format!("{:?}", config).contains("0123456789abcdef"));
    }

    #[test]
    fn test_unrestricted_policy_by_default() {
        let config = ServerConfig::from_connection(&complete()).unwrap();
        assert!(!config.policy().allowed_models.is_restricted());
        assert!(!config.policy().read_only);
    }
}
