use std::sync::RwLock;

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use velora_core::BackendError;

/// Postgres unique-constraint violation, surfaced verbatim by the data API.
const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Client for the hosted backend's data and auth APIs.
///
/// Requests carry the project api key; once a user signs in, their access
/// token replaces the api key as the bearer so row-level security applies.
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    token: RwLock<Option<String>>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            token: RwLock::new(None),
        }
    }

    /// Use `token` as the bearer for subsequent requests.
    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
    }

    /// Fall back to the anonymous api key.
    pub fn clear_access_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub(crate) fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .unwrap_or_else(|| self.api_key.clone())
    }

    pub(crate) fn get(&self, url: String) -> RequestBuilder {
        self.with_headers(self.http.get(url))
    }

    pub(crate) fn post(&self, url: String) -> RequestBuilder {
        self.with_headers(self.http.post(url))
    }

    /// POST carrying a specific bearer instead of the stored one, used for
    /// invalidating a session that is not the active one.
    pub(crate) fn post_as(&self, url: String, bearer: &str) -> RequestBuilder {
        self.http
            .post(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    pub(crate) fn patch(&self, url: String) -> RequestBuilder {
        self.with_headers(self.http.patch(url))
    }

    pub(crate) fn delete(&self, url: String) -> RequestBuilder {
        self.with_headers(self.http.delete(url))
    }

    fn with_headers(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    /// Send a request and decode a JSON body from a success response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, BackendError> {
        let resp = self.send(req).await?;
        resp.json::<T>()
            .await
            .map_err(|err| BackendError::parse(err.to_string()))
    }

    /// Send a request, discarding any success body.
    pub(crate) async fn send_ok(&self, req: RequestBuilder) -> Result<(), BackendError> {
        self.send(req).await.map(|_| ())
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, BackendError> {
        let resp = req
            .send()
            .await
            .map_err(|err| BackendError::network(err.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(map_error_body(status.as_u16(), &body))
    }
}

/// Error payload shape shared by the data and auth APIs. Fields vary by
/// endpoint; whichever message field is present wins.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

pub(crate) fn map_error_body(status: u16, body: &str) -> BackendError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    if let Some(err) = parsed {
        if err.code.as_deref() == Some(UNIQUE_VIOLATION_CODE) {
            return BackendError::UniqueViolation;
        }
        let message = err
            .message
            .or(err.msg)
            .or(err.error_description)
            .unwrap_or_else(|| body.to_string());
        return BackendError::api(status, message);
    }
    BackendError::api(status, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_code_maps_to_its_own_variant() {
        let err = map_error_body(
            409,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        assert!(err.is_unique_violation());
    }

    #[test]
    fn data_api_errors_keep_status_and_message() {
        let err = map_error_body(404, r#"{"code":"PGRST116","message":"no rows returned"}"#);
        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no rows returned");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn auth_api_errors_read_alternate_message_fields() {
        let err = map_error_body(400, r#"{"error_description":"Invalid login credentials"}"#);
        match err {
            BackendError::Api { message, .. } => {
                assert_eq!(message, "Invalid login credentials")
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_bodies_fall_back_to_raw_text() {
        let err = map_error_body(502, "upstream unavailable");
        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let backend = RestBackend::new("https://example.supabase.co/", "anon-key");
        assert_eq!(
            backend.rest_url("products?select=*"),
            "https://example.supabase.co/rest/v1/products?select=*"
        );
        assert_eq!(
            backend.auth_url("token?grant_type=password"),
            "https://example.supabase.co/auth/v1/token?grant_type=password"
        );
    }
}
