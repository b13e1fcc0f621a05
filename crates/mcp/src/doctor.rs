//! `odoo-mcp doctor`: check configuration and connectivity.

use crate::config::{ConnectionArgs, ServerConfig};
use std::io::Write;
use std::process::ExitCode;

pub const EXIT_MISSING_CONFIG: u8 = 1;
pub const EXIT_CONNECTION_FAILED: u8 = 2;

/// Keep the first and last four characters of long secrets.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Common mistakes in the configured base URL.
pub fn url_warnings(raw: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let path = match url::Url::parse(raw) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => url.path().to_string(),
        Ok(url) => {
            warnings.push("ODOO_URL should be a full URL like https://company.odoo.com".to_string());
            url.path().to_string()
        }
        Err(_) => {
            warnings.push("ODOO_URL should be a full URL like https://company.odoo.com".to_string());
            raw.to_string()
        }
    };
    if path.contains("/odoo") {
        warnings.push("ODOO_URL should be the base host; remove '/odoo' from the URL".to_string());
    }
    warnings
}

/// Run the diagnostics, printing to stdout.
pub async fn run(args: &ConnectionArgs) -> ExitCode {
    let mut stdout = std::io::stdout();
    match diagnose(args, &mut stdout).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "Failed to write doctor report");
            ExitCode::FAILURE
        }
    }
}

/// Write the report to `out` and return the exit code.
pub async fn diagnose<W: Write>(args: &ConnectionArgs, out: &mut W) -> std::io::Result<u8> {
    writeln!(out, "Odoo MCP Doctor")?;
    writeln!(out, "{}", "=".repeat(60))?;

    let settings = serde_json::json!({
        "ODOO_URL": args.url.as_deref().unwrap_or_default(),
        "ODOO_DB": args.db.as_deref().unwrap_or_default(),
        "ODOO_USERNAME": args.username.as_deref().unwrap_or_default(),
        "ODOO_API_KEY": args.api_key.as_deref().map(mask_secret).unwrap_or_default(),
        "ODOO_CA_BUNDLE": args.ca_bundle_path().map(|p| p.display().to_string()),
        "ODOO_TIMEOUT_SECS": args.timeout_secs,
        "ODOO_ALLOWED_MODELS": args.allowed_models,
        "ODOO_READ_ONLY": args.read_only,
    });
    writeln!(out, "{}", pretty(&settings))?;

    let missing = args.missing_variables();
    if !missing.is_empty() {
        writeln!(out, "\nERROR: Missing required env vars: {}", missing.join(", "))?;
        return Ok(EXIT_MISSING_CONFIG);
    }

    let warnings = url_warnings(args.url.as_deref().unwrap_or_default());
    if !warnings.is_empty() {
        writeln!(out, "\nURL Warnings:")?;
        for warning in &warnings {
            writeln!(out, "- {}", warning)?;
        }
    }

    match check_connection(args).await {
        Ok(report) => {
            writeln!(out, "\nConnection Check:")?;
            writeln!(out, "{}", pretty(&report))?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "\nERROR: Connection check failed")?;
            writeln!(out, "{:#}", e)?;
            Ok(EXIT_CONNECTION_FAILED)
        }
    }
}

async fn check_connection(args: &ConnectionArgs) -> anyhow::Result<serde_json::Value> {
    let client = ServerConfig::from_connection(args)?.connect()?;

    let version = client.version().await?;
    let uid = client.uid().await?;
    let projects = client.projects().list(true).await?;

    Ok(serde_json::json!({
        "status": "connected",
        "uid": uid,
        "server_version": version.get("server_version").cloned().unwrap_or_default(),
        "active_projects": projects.len(),
    }))
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("abcd1234"), "********");
        assert_eq!(mask_secret("abcd12345678wxyz"), "abcd...wxyz");
    }

    #[test]
    fn test_url_warnings() {
        assert!(url_warnings("https://acme.odoo.com").is_empty());
        assert_eq!(
            url_warnings("https://acme.odoo.com/odoo"),
            vec!["ODOO_URL should be the base host; remove '/odoo' from the URL".to_string()]
        );
        assert_eq!(url_warnings("acme.odoo.com").len(), 1);
        assert_eq!(url_warnings("acme.odoo.com/odoo").len(), 2);
    }

    #[tokio::test]
    async fn test_missing_variables_exit_code() {
        let args = ConnectionArgs {
            url: Some("https://acme.odoo.com".into()),
            api_key: Some("0123456789abcdef".into()),
            ..Default::default()
        };
        let mut out = Vec::new();

        let code = diagnose(&args, &mut out).await.unwrap();
        let report = String::from_utf8(out).unwrap();

        assert_eq!(code, EXIT_MISSING_CONFIG);
        assert!(report.contains("Missing required env vars: ODOO_DB, ODOO_USERNAME"));
        assert!(report.contains("0123...cdef"));
        assert!(!report.contains("0123456789abcdef"));
    }
}
