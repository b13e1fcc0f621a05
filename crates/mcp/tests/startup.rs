use std::process::{Command, Stdio};

fn odoo_mcp() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_odoo-mcp"));
    command
        .env_clear()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

#[test]
fn serve_without_configuration_fails_fast() {
    let output = odoo_mcp().output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ODOO_URL, ODOO_DB, ODOO_USERNAME, ODOO_API_KEY"));
}

#[test]
fn serve_reports_only_what_is_missing() {
    let output = odoo_mcp()
        .env("ODOO_URL", "https://acme.odoo.com")
        .env("ODOO_DB", "acme")
        .arg("serve")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ODOO_USERNAME, ODOO_API_KEY"));
    assert!(!stderr.contains("ODOO_DB,"));
}

#[test]
fn doctor_exits_one_on_missing_configuration() {
    let output = odoo_mcp().arg("doctor").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Missing required env vars"));
}

#[test]
fn configured_server_exits_cleanly_when_stdin_closes() {
    let output = odoo_mcp()
        .env("ODOO_URL", "http://127.0.0.1:9")
        .env("ODOO_DB", "acme")
        .env("ODOO_USERNAME", "bot@acme.com")
        .env("ODOO_API_KEY", "secret-key")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
