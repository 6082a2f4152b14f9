//! reqwest implementation of [`IdentityApi`]

use super::{AuthResponse, Credentials, IdentityApi, Registration};
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::rbac::RoleInfo;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Identity client talking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpIdentityApi {
    client: reqwest::Client,
    base_url: String,
    login_path: String,
    register_path: String,
    validate_path: String,
    roles_path: String,
}

impl HttpIdentityApi {
    /// Client with default endpoint paths
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let config = ApiConfig {
            base_url: base_url.into(),
            timeout_secs: timeout.as_secs().max(1),
            ..ApiConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            register_path: config.register_path.clone(),
            validate_path: config.validate_path.clone(),
            roles_path: config.roles_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AuthError> {
        let response = request.send().await.map_err(|e| AuthError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        let body = response.bytes().await.map_err(|e| AuthError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }
}

/// Map non-2xx answers onto the error taxonomy
async fn check_status(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The body is advisory here; a failed read only loses the message
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .as_ref()
        .and_then(error_message);

    log::debug!("Identity endpoint answered {}", status);

    if status == StatusCode::UNAUTHORIZED {
        Err(AuthError::Unauthorized { message })
    } else {
        Err(AuthError::Rejected { status: status.as_u16(), message })
    }
}

fn error_message(body: &serde_json::Value) -> Option<String> {
    ["message", "error"]
        .into_iter()
        .find_map(|field| body.get(field).and_then(|v| v.as_str()))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Roles arrive either as a bare array or wrapped in `data` / `roles`
fn role_list(body: serde_json::Value) -> Result<Vec<RoleInfo>, AuthError> {
    let list = match body {
        serde_json::Value::Array(_) => body,
        serde_json::Value::Object(mut map) => map
            .remove("data")
            .or_else(|| map.remove("roles"))
            .ok_or_else(|| AuthError::MalformedResponse("role list not found".to_string()))?,
        _ => return Err(AuthError::MalformedResponse("role list not found".to_string())),
    };

    serde_json::from_value(list).map_err(|e| AuthError::MalformedResponse(e.to_string()))
}

#[async_trait::async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        log::debug!("POST {}", self.login_path);
        self.send(self.client.post(self.url(&self.login_path)).json(credentials)).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, AuthError> {
        log::debug!("POST {}", self.register_path);
        self.send(self.client.post(self.url(&self.register_path)).json(registration)).await
    }

    async fn validate_token(&self, token: &str) -> Result<serde_json::Value, AuthError> {
        log::debug!("GET {}", self.validate_path);
        self.send(self.client.get(self.url(&self.validate_path)).bearer_auth(token)).await
    }

    async fn roles(&self, token: Option<&str>) -> Result<Vec<RoleInfo>, AuthError> {
        log::debug!("GET {}", self.roles_path);
        let mut request = self.client.get(self.url(&self.roles_path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let body: serde_json::Value = self.send(request).await?;
        role_list(body)
    }
}
