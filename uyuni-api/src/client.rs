//! HTTP client and session handling for the Uyuni server API

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// Connection settings for one Uyuni server
#[derive(Debug, Clone)]
pub struct ConnectionDetails {
    /// Server host name, or a full `http(s)://` base URL
    pub server: String,
    /// API user login
    pub user: String,
    /// API user password
    pub password: String,
    /// Path to a CA certificate bundle in PEM format
    pub ca_cert: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

impl ConnectionDetails {
    pub fn new(
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
            password: password.into(),
            ca_cert: None,
            insecure: false,
        }
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_ca_cert(mut self, path: impl Into<String>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }
}

/// Response envelope every Uyuni API endpoint returns
#[derive(Debug, serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

/// Authenticated client for the Uyuni server API
///
/// The session cookie obtained at login lives in the cookie store, so the
/// client itself is immutable after construction and safe to share across
/// concurrent callers.
#[derive(Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

/// Build a client for the given connection and perform the login handshake
pub async fn init(details: &ConnectionDetails) -> ApiResult<HttpClient> {
    let mut builder = reqwest::Client::builder().cookie_store(true);

    if details.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(path) = &details.ca_cert {
        let pem = std::fs::read(path)
            .map_err(|e| ApiError::Configuration(format!("cannot read CA file {path}: {e}")))?;
        let cert = reqwest::Certificate::from_pem(&pem)
            .map_err(|e| ApiError::Configuration(format!("invalid CA certificate {path}: {e}")))?;
        builder = builder.add_root_certificate(cert);
    }

    let http = builder
        .build()
        .map_err(|e| ApiError::Configuration(format!("cannot build HTTP client: {e}")))?;

    let client = HttpClient {
        http,
        base_url: api_root(&details.server),
    };
    client.login(details).await?;

    info!(server = %details.server, user = %details.user, "logged in to Uyuni API");
    Ok(client)
}

/// API root for a configured server value
///
/// A bare host name gets the https scheme; an explicit scheme is honored
/// so the client can also point at plain-http test servers.
fn api_root(server: &str) -> String {
    let base = if server.starts_with("http://") || server.starts_with("https://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("https://{server}")
    };
    format!("{base}/rhn/manager/api")
}

impl HttpClient {
    /// Perform a GET request and unwrap the result envelope
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::transport(path, e))?;
        self.unwrap_envelope(path, response).await
    }

    /// Perform a POST request with a JSON body and unwrap the result envelope
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::transport(path, e))?;
        self.unwrap_envelope(path, response).await
    }

    async fn login(&self, details: &ConnectionDetails) -> ApiResult<()> {
        let body = json!({
            "login": details.user,
            "password": details.password,
        });
        let response = self
            .http
            .post(self.url("auth/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Login {
                server: details.server.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Login {
                server: details.server.clone(),
                message: format!("HTTP {status}"),
            });
        }

        // The login endpoint only carries the success flag, never a result.
        let envelope: ApiResponse<serde_json::Value> =
            response.json().await.map_err(|e| ApiError::Login {
                server: details.server.clone(),
                message: e.to_string(),
            })?;
        if !envelope.success {
            return Err(ApiError::Login {
                server: details.server.clone(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "login rejected".to_string()),
            });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::server(path, format!("HTTP {status}")));
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ApiError::decode(path, e))?;

        if !envelope.success {
            return Err(ApiError::server(
                path,
                envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| ApiError::server(path, "response envelope carried no result"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/rhn/manager/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(server)
            .await;
    }

    fn details_for(server: &MockServer) -> ConnectionDetails {
        ConnectionDetails::new(server.uri(), "admin", "secret")
    }

    #[test]
    fn test_api_root_defaults_to_https() {
        assert_eq!(
            api_root("uyuni.example.com"),
            "https://uyuni.example.com/rhn/manager/api"
        );
        assert_eq!(
            api_root("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/rhn/manager/api"
        );
    }

    #[tokio::test]
    async fn test_init_performs_login_handshake() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rhn/manager/api/auth/login"))
            .and(body_json(json!({"login": "admin", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        init(&details_for(&server)).await.unwrap();
    }

    #[tokio::test]
    async fn test_init_surfaces_rejected_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rhn/manager/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": false, "message": "Either the password or username is incorrect."}),
            ))
            .mount(&server)
            .await;

        let err = init(&details_for(&server)).await.unwrap_err();
        match err {
            ApiError::Login { message, .. } => {
                assert!(message.contains("incorrect"));
            }
            other => panic!("expected login error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_unwraps_result() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/rhn/manager/api/user/listUsers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": true, "result": [{"id": 1, "login": "admin"}]}),
            ))
            .mount(&server)
            .await;

        let client = init(&details_for(&server)).await.unwrap();
        let result: Vec<serde_json::Value> = client.get("user/listUsers").await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["login"], "admin");
    }

    #[tokio::test]
    async fn test_post_sends_body_and_unwraps_result() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/rhn/manager/api/user/create"))
            .and(body_json(json!({"login": "sgiertz"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "result": 1})),
            )
            .mount(&server)
            .await;

        let client = init(&details_for(&server)).await.unwrap();
        let result: i64 = client
            .post("user/create", &json!({"login": "sgiertz"}))
            .await
            .unwrap();
        assert_eq!(result, 1);
    }

    #[tokio::test]
    async fn test_failure_envelope_surfaces_server_message() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/rhn/manager/api/user/getDetails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": false, "message": "No such user: ghost"}),
            ))
            .mount(&server)
            .await;

        let client = init(&details_for(&server)).await.unwrap();
        let err = client
            .get::<serde_json::Value>("user/getDetails?login=ghost")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No such user: ghost"));
    }

    #[tokio::test]
    async fn test_error_status_is_a_server_error() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/rhn/manager/api/user/listUsers"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = init(&details_for(&server)).await.unwrap();
        let err = client
            .get::<Vec<serde_json::Value>>("user/listUsers")
            .await
            .unwrap_err();
        match err {
            ApiError::Server { message, .. } => assert!(message.contains("500")),
            other => panic!("expected server error, got {other:?}"),
        }
    }
}
