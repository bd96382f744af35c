//! REST API client
//!
//! The single configured HTTP client every command goes through. One base
//! URL, JSON defaults, connect/request timeouts, and a bearer token that is
//! installed at login and cleared at logout. The server answers every
//! endpoint with the uniform envelope
//! `{ status: "success"|"error", data, message? }`; paginated listings
//! additionally carry `meta.current_page` / `meta.last_page`.
//!
//! There is deliberately no retry and no refresh interceptor: failures are
//! surfaced to the caller, which decides between an inline error and a toast.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::errors::AppError;

/// Uniform response envelope
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the envelope into the carried payload.
    pub fn into_result(self) -> Result<T, AppError> {
        if self.status == "success" {
            self.data
                .ok_or_else(|| AppError::Internal("Response envelope carried no data".into()))
        } else {
            Err(AppError::Api(
                self.message.unwrap_or_else(|| "Request failed".into()),
            ))
        }
    }

    /// Status-only unwrap for endpoints whose success response carries no
    /// payload (deletes answer `{"status":"success","message":...}` with
    /// `data` null or absent).
    pub fn into_unit(self) -> Result<(), AppError> {
        if self.status == "success" {
            Ok(())
        } else {
            Err(AppError::Api(
                self.message.unwrap_or_else(|| "Request failed".into()),
            ))
        }
    }
}

/// Pagination metadata returned by paginated listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
}

/// Envelope variant for paginated listings
#[derive(Debug, Deserialize)]
struct PaginatedEnvelope<T> {
    status: String,
    #[serde(default = "Option::default")]
    data: Option<Vec<T>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.meta.current_page < self.meta.last_page
    }
}

/// Configured HTTP client for the MyAppleCare API
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Install the bearer token after a successful login (or hydrate).
    pub fn set_token(&self, token: &str) {
        *self.token.write().unwrap() = Some(token.to_string());
    }

    /// Drop the bearer token at logout.
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.token.read().unwrap().as_deref() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| AppError::Internal(format!("Malformed API response: {}", e)))?;
        envelope.into_result()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.execute(self.builder(Method::GET, path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        self.execute(self.builder(Method::GET, path).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.execute(self.builder(Method::POST, path).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.execute(self.builder(Method::PUT, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let response = self.builder(Method::DELETE, path).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| AppError::Internal(format!("Malformed API response: {}", e)))?;
        envelope.into_unit()
    }

    /// Multipart submission for image-bearing entities.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, AppError> {
        self.execute(self.builder(Method::POST, path).multipart(form))
            .await
    }

    /// Fetch one page of a paginated listing.
    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>, AppError> {
        let response = self.builder(Method::GET, path).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let envelope: PaginatedEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| AppError::Internal(format!("Malformed API response: {}", e)))?;

        if envelope.status != "success" {
            return Err(AppError::Api(
                envelope.message.unwrap_or_else(|| "Request failed".into()),
            ));
        }

        let items = envelope.data.unwrap_or_default();
        let meta = envelope.meta.unwrap_or(PageMeta {
            current_page: 1,
            last_page: 1,
        });

        Ok(Page { items, meta })
    }
}

/// Build a multipart file part from a local image path.
pub fn image_part(path: &str) -> Result<Part, AppError> {
    crate::validation::validate_file_path(path).map_err(AppError::Validation)?;

    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Internal(format!("Failed to read image file: {}", e)))?;
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(Part::bytes(bytes).file_name(file_name))
}

/// Map a non-2xx response to the error taxonomy, preferring the server's
/// envelope message when the body carries one.
fn map_http_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("Request failed (HTTP {})", status.as_u16()));

    match status {
        StatusCode::UNAUTHORIZED => AppError::Auth(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Api(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Dummy {
        id: i64,
        name: String,
    }

    #[test]
    fn success_envelope_unwraps_data() {
        let envelope: ApiEnvelope<Dummy> =
            serde_json::from_str(r#"{"status":"success","data":{"id":1,"name":"iPhone 13"}}"#)
                .unwrap();
        let dummy = envelope.into_result().unwrap();
        assert_eq!(dummy, Dummy { id: 1, name: "iPhone 13".into() });
    }

    #[test]
    fn error_envelope_surfaces_message() {
        let envelope: ApiEnvelope<Dummy> = serde_json::from_str(
            r#"{"status":"error","message":"Price exceeds selling price"}"#,
        )
        .unwrap();
        match envelope.into_result() {
            Err(AppError::Api(msg)) => assert_eq!(msg, "Price exceeds selling price"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn delete_envelope_without_data_is_success() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"status":"success","data":null,"message":"Deleted"}"#)
                .unwrap();
        assert!(envelope.into_unit().is_ok());

        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"status":"success","message":"Deleted"}"#).unwrap();
        assert!(envelope.into_unit().is_ok());
    }

    #[test]
    fn delete_error_envelope_surfaces_message() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"status":"error","message":"Item already removed"}"#)
                .unwrap();
        match envelope.into_unit() {
            Err(AppError::Api(msg)) => assert_eq!(msg, "Item already removed"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let envelope: PaginatedEnvelope<Dummy> = serde_json::from_str(
            r#"{"status":"success","data":[{"id":1,"name":"a"}],"meta":{"current_page":2,"last_page":5}}"#,
        )
        .unwrap();
        let meta = envelope.meta.unwrap();
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, 5);
        let page = Page { items: envelope.data.unwrap(), meta };
        assert!(page.has_more());
    }

    #[test]
    fn http_error_prefers_envelope_message() {
        let err = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"status":"error","message":"Quantity not available"}"#,
        );
        match err {
            AppError::Api(msg) => assert_eq!(msg, "Quantity not available"),
            other => panic!("unexpected: {}", other),
        }
    }

    #[test]
    fn unauthorized_maps_to_auth_error() {
        let err = map_http_error(StatusCode::UNAUTHORIZED, "not json");
        assert!(matches!(err, AppError::Auth(_)));
    }
}
