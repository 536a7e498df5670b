//! HTTP API client for the records server.

use async_trait::async_trait;
use campus_records::{
    activity::ActivityLogEntry,
    directory::UserPatch,
    net::{
        ApiError, ApiResult, LoginRequest, LoginResponse, RecordsApi, RegisterRequest, wire,
    },
    session::UserAccount,
};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Instant;

use crate::{config::ClientConfig, logging::log_api_request};

/// Base of the per-account and export endpoints
const USERS_RESOURCE: &str = "/users";

/// API client for communicating with the records server
pub struct HttpApi {
    base_url: String,
    users_path: String,
    client: reqwest::Client,
}

impl HttpApi {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialised
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            users_path: config.users_path.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn any non-2xx status into an [`ApiError`]
    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> ApiResult<Response> {
        let started = Instant::now();
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        log_api_request(
            method.as_str(),
            path,
            status.as_u16(),
            started.elapsed().as_millis() as u64,
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = read_body(response).await?;
        Err(ApiError::from_status(
            status.as_u16(),
            wire::error_message(&String::from_utf8_lossy(&body)),
        ))
    }

    async fn send_json(&self, method: Method, path: &str, builder: RequestBuilder) -> ApiResult<Value> {
        let response = self.send(method, path, builder).await?;
        let body = read_body(response).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(format!("{path}: {e}")))
    }

    /// Mutations and export stay under `/users` whatever the list path is
    fn user_path(&self, id: &str) -> String {
        format!("{USERS_RESOURCE}/{id}")
    }
}

#[async_trait]
impl RecordsApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let path = "/auth/login";
        let builder = self.request(Method::POST, path, None).json(request);
        let body = self
            .send_json(Method::POST, path, builder)
            .await
            .map_err(|err| match err {
                // The server answers a bad pair with 400 or 401
                ApiError::Unauthorized
                | ApiError::Rejected {
                    status: 400, ..
                } => ApiError::InvalidCredentials,
                other => other,
            })?;
        wire::parse_login(body)
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        let path = "/auth/register";
        let builder = self.request(Method::POST, path, None).json(request);
        self.send(Method::POST, path, builder).await?;
        Ok(())
    }

    async fn current_user(&self, token: &str) -> ApiResult<UserAccount> {
        let path = "/auth/user";
        let builder = self.request(Method::GET, path, Some(token));
        let body = self.send_json(Method::GET, path, builder).await?;
        // Some deployments wrap the account as {"user": {...}}
        match body {
            Value::Object(mut map) if map.contains_key("user") => {
                wire::parse_user(map.remove("user").unwrap_or_default())
            }
            other => wire::parse_user(other),
        }
    }

    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserAccount>> {
        let path = self.users_path.clone();
        let builder = self.request(Method::GET, &path, Some(token));
        let body = self.send_json(Method::GET, &path, builder).await?;
        wire::parse_users(body)
    }

    async fn update_user(&self, token: &str, id: &str, patch: &UserPatch) -> ApiResult<()> {
        let path = self.user_path(id);
        let builder = self.request(Method::PUT, &path, Some(token)).json(patch);
        self.send(Method::PUT, &path, builder).await?;
        Ok(())
    }

    async fn delete_user(&self, token: &str, id: &str) -> ApiResult<()> {
        let path = self.user_path(id);
        let builder = self.request(Method::DELETE, &path, Some(token));
        self.send(Method::DELETE, &path, builder).await?;
        Ok(())
    }

    async fn activity_logs(&self, token: &str) -> ApiResult<Vec<ActivityLogEntry>> {
        let path = "/logs";
        let builder = self.request(Method::GET, path, Some(token));
        let body = self.send_json(Method::GET, path, builder).await?;
        wire::parse_activity_logs(body)
    }

    async fn export_users(&self, token: &str) -> ApiResult<Vec<u8>> {
        let path = format!("{USERS_RESOURCE}/export");
        let builder = self.request(Method::GET, &path, Some(token));
        let response = self.send(Method::GET, &path, builder).await?;
        read_body(response).await
    }
}

/// Body bytes; a stalled or cut-off body is a transport failure
async fn read_body(response: Response) -> ApiResult<Vec<u8>> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    Ok(bytes.to_vec())
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if let Some(status) = err.status() {
        ApiError::from_status(status.as_u16(), None)
    } else {
        ApiError::NetworkUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api(url: &str) -> HttpApi {
        HttpApi::new(&ClientConfig {
            api_url: url.to_string(),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_is_normalised() {
        assert_eq!(api("http://localhost:5000/api/").base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_user_path_ignores_list_path() {
        let mut client = api("http://localhost:5000/api");
        assert_eq!(client.user_path("abc"), "/users/abc");

        client.users_path = "/admin/users".to_string();
        assert_eq!(client.user_path("abc"), "/users/abc");
    }
}
