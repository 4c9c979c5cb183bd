//! Client for the remote savepoint conversion service.
//!
//! The service takes the stripped component tree of a savepoint and returns a
//! derived tree plus the invisible ids that apply to it:
//!
//! ```text
//! POST {backend}/convert
//! → { "key": "...", "savepoint": { "invisible": [...], "componentTree": {...} } }
//! ← { "invisible": [...], "componentTree": {...} }      (status < 400)
//! ← plain text error message                             (status ≥ 400)
//! ```

use reqwest::Client;
use savepoint_core::ComponentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{ExportError, ExportResult};

const CONVERT_PATH: &str = "convert";

/// Request body for the conversion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertRequest<'a> {
    /// License key the backend checks before converting.
    pub key: &'a str,
    /// The savepoint subset the conversion needs.
    pub savepoint: ConvertSavepoint<'a>,
}

/// Savepoint subset sent for conversion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertSavepoint<'a> {
    /// Ids hidden in the editor.
    pub invisible: &'a [ComponentId],
    /// Stripped component tree under the synthetic root.
    pub component_tree: Value,
}

impl<'a> ConvertRequest<'a> {
    /// Build a request from its parts.
    #[must_use]
    pub fn new(key: &'a str, invisible: &'a [ComponentId], component_tree: Value) -> Self {
        Self {
            key,
            savepoint: ConvertSavepoint {
                invisible,
                component_tree,
            },
        }
    }
}

/// Successful conversion result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Ids hidden in the converted tree.
    #[serde(default)]
    pub invisible: Vec<ComponentId>,
    /// The converted tree.
    pub component_tree: Value,
}

/// HTTP client for the conversion endpoint.
#[derive(Debug, Clone)]
pub struct ConvertClient {
    http: Client,
    endpoint: Url,
}

impl ConvertClient {
    /// Create a client for the backend at `backend_url`.
    ///
    /// `/convert` is appended to whatever path the URL already has.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidUrl`] if the URL is malformed or not HTTP.
    /// Returns [`ExportError::Http`] if the HTTP client fails to build.
    pub fn new(backend_url: &str) -> ExportResult<Self> {
        let mut endpoint =
            Url::parse(backend_url).map_err(|e| ExportError::InvalidUrl(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ExportError::InvalidUrl(format!(
                "unsupported scheme {:?}",
                endpoint.scheme()
            )));
        }
        endpoint
            .path_segments_mut()
            .map_err(|()| ExportError::InvalidUrl(backend_url.to_string()))?
            .pop_if_empty()
            .push(CONVERT_PATH);

        let http = Client::builder()
            .user_agent(concat!("savepoint-export/", env!("CARGO_PKG_VERSION")))
            // Proxy detection pulls in system configuration lookups we never need
            .no_proxy()
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// The full conversion endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit a savepoint for conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Remote`] with the response body if the backend
    /// answers with a client or server error status, or a transport/parse
    /// error otherwise.
    pub async fn convert(&self, request: &ConvertRequest<'_>) -> ExportResult<ConvertResponse> {
        tracing::debug!("Posting savepoint to {}", self.endpoint);
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!("Conversion rejected with status {status}");
            return Err(ExportError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_appends_convert() {
        let client = ConvertClient::new("https://backend.example").expect("client");
        assert_eq!(client.endpoint().as_str(), "https://backend.example/convert");

        let client = ConvertClient::new("https://backend.example/api/").expect("client");
        assert_eq!(client.endpoint().as_str(), "https://backend.example/api/convert");
    }

    #[test]
    fn test_invalid_urls_rejected() {
        assert!(matches!(
            ConvertClient::new("not a url"),
            Err(ExportError::InvalidUrl(_))
        ));
        assert!(matches!(
            ConvertClient::new("ftp://backend.example"),
            Err(ExportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let invisible = vec![ComponentId::from("a")];
        let request = ConvertRequest::new("KEY", &invisible, json!({ "components": [] }));
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({
                "key": "KEY",
                "savepoint": { "invisible": ["a"], "componentTree": { "components": [] } }
            })
        );
    }

    #[tokio::test]
    async fn test_convert_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert"))
            .and(body_json(json!({
                "key": "KEY",
                "savepoint": { "invisible": [], "componentTree": { "components": [] } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "invisible": ["x"],
                "componentTree": { "converted": true }
            })))
            .mount(&server)
            .await;

        let client = ConvertClient::new(&server.uri()).expect("client");
        let response = client
            .convert(&ConvertRequest::new("KEY", &[], json!({ "components": [] })))
            .await
            .expect("convert");

        assert_eq!(response.invisible, vec![ComponentId::from("x")]);
        assert_eq!(response.component_tree, json!({ "converted": true }));
    }

    #[tokio::test]
    async fn test_convert_error_body_is_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert"))
            .respond_with(ResponseTemplate::new(402).set_body_string("Invalid license key"))
            .mount(&server)
            .await;

        let client = ConvertClient::new(&server.uri()).expect("client");
        let err = client
            .convert(&ConvertRequest::new("bad", &[], json!({})))
            .await
            .unwrap_err();

        match err {
            ExportError::Remote { status, body } => {
                assert_eq!(status, 402);
                assert_eq!(body, "Invalid license key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_convert_garbage_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ConvertClient::new(&server.uri()).expect("client");
        let err = client
            .convert(&ConvertRequest::new("KEY", &[], json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }
}
