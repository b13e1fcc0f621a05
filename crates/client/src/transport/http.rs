//! HTTP transport layer for the Odoo client.

use crate::config::ClientConfig;
use crate::error::{OdooError, OdooResult};
use crate::transport::xmlrpc;
use reqwest::{header, Certificate, Client};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The two XML-RPC services exposed by Odoo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `xmlrpc/2/common`: version and authentication.
    Common,
    /// `xmlrpc/2/object`: `execute_kw` on models.
    Object,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Object => "object",
        }
    }
}

/// HTTP transport carrying XML-RPC calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> OdooResult<Self> {
        Self::with_root_certificates(config, Vec::new())
    }

    /// Create a transport trusting extra root certificates on top of the bundled ones.
    pub fn with_root_certificates(
        config: Arc<ClientConfig>,
        certificates: Vec<Certificate>,
    ) -> OdooResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/xml"),
        );

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(concat!("odoo-client/", env!("CARGO_PKG_VERSION")));

        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Build the URL of an endpoint.
    fn build_url(&self, endpoint: Endpoint) -> OdooResult<url::Url> {
        let url = match endpoint {
            Endpoint::Common => self.config.common_url(),
            Endpoint::Object => self.config.object_url(),
        };
        url.map_err(OdooError::InvalidUrl)
    }

    /// Issue one XML-RPC call and decode its result.
    pub async fn call(&self, endpoint: Endpoint, method: &str, params: &[Value]) -> OdooResult<Value> {
        let url = self.build_url(endpoint)?;
        debug!(endpoint = endpoint.as_str(), method = method, "XML-RPC call");

        let body = xmlrpc::encode_call(method, params);
        let response = self.client.post(url).body(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(OdooError::from_response(status.as_u16(), &text));
        }

        xmlrpc::decode_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig::new(
            url::Url::parse(base_url).unwrap(),
            "test-db",
            "admin",
            "api-key",
        ))
    }

    fn response(value_xml: &str) -> String {
        format!(
            "<?xml version='1.0'?><methodResponse><params><param><value>{value_xml}</value></param></params></methodResponse>"
        )
    }

    #[tokio::test]
    async fn test_call_common_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xmlrpc/2/common"))
            .and(header("content-type", "text/xml"))
            .and(body_string_contains("<methodName>version</methodName>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response(
                "<struct><member><name>server_version</name><value><string>17.0</string></value></member></struct>",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let result = transport.call(Endpoint::Common, "version", &[]).await.unwrap();

        assert_eq!(result, json!({"server_version": "17.0"}));
    }

    #[tokio::test]
    async fn test_call_object_endpoint_sends_params() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xmlrpc/2/object"))
            .and(body_string_contains("<value><string>project.task</string></value>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response("<int>12</int>")))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let result = transport
            .call(
                Endpoint::Object,
                "execute_kw",
                &[json!("test-db"), json!(2), json!("api-key"), json!("project.task"), json!("create")],
            )
            .await
            .unwrap();

        assert_eq!(result, json!(12));
    }

    #[tokio::test]
    async fn test_fault_is_surfaced_with_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xmlrpc/2/object"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<methodResponse><fault><value><struct>\
                 <member><name>faultCode</name><value><int>1</int></value></member>\
                 <member><name>faultString</name><value><string>Record does not exist</string></value></member>\
                 </struct></value></fault></methodResponse>",
            ))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let err = transport
            .call(Endpoint::Object, "execute_kw", &[])
            .await
            .unwrap_err();

        assert_eq!(err.remote_message(), "Record does not exist");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xmlrpc/2/common"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call(Endpoint::Common, "version", &[]).await.unwrap_err();

        match err {
            OdooError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Nothing listens on port 9 locally.
        let transport = HttpTransport::new(create_config("http://127.0.0.1:9")).unwrap();
        let err = transport.call(Endpoint::Common, "version", &[]).await.unwrap_err();

        assert!(matches!(err, OdooError::Http(_)));
    }

    #[test]
    fn test_build_url() {
        let transport = HttpTransport::new(create_config("http://localhost:8069")).unwrap();

        let url = transport.build_url(Endpoint::Object).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8069/xmlrpc/2/object");
    }

    #[test]
    fn test_build_url_with_prefix() {
        let transport = HttpTransport::new(create_config("http://localhost:8069/erp/")).unwrap();

        let url = transport.build_url(Endpoint::Common).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8069/erp/xmlrpc/2/common");
    }
}
