//! Plan service API client.
//!
//! One REST resource per entity kind:
//!
//! | kind      | resource             |
//! |-----------|----------------------|
//! | asset     | `assets`             |
//! | liability | `liabilities`        |
//! | income    | `cashflow/incomes`   |
//! | expense   | `cashflow/expenses`  |
//!
//! Each supports `GET /{resource}`, `GET|PUT|DELETE /{resource}/{id}` and
//! `POST /{resource}`. Audit events go to `POST /intents/events`.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use wealthplan_core::intents::{IntentAuditEvent, IntentAuditSink};
use wealthplan_core::plan::{EntityKind, PlanRecord, PlanRepositoryTrait};

use crate::error::{RemoteError, Result};
use crate::types::{ApiErrorResponse, RemoteConfig};

/// Audit endpoint path.
const AUDIT_EVENTS_PATH: &str = "intents/events";

/// Resource path for an entity kind, relative to the base URL.
pub fn resource_path(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Asset => "assets",
        EntityKind::Liability => "liabilities",
        EntityKind::Income => "cashflow/incomes",
        EntityKind::Expense => "cashflow/expenses",
    }
}

/// Client for the remote plan service.
#[derive(Debug, Clone)]
pub struct PlanApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl PlanApiClient {
    /// Create a new plan service client.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteError::Config(format!(
                "base URL must be http(s): '{}'",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create headers for an API request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.access_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| {
                    RemoteError::Config("access token is not a valid header value".to_string())
                })?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn record_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource_path(kind), id)
    }

    /// Reads the body and turns non-2xx responses into `RemoteError::Rejected`.
    async fn read_body(response: reqwest::Response) -> Result<(u16, String)> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(error) => match error.code {
                    Some(code) => format!("{}: {}", code, error.message),
                    None => error.message,
                },
                Err(_) if body.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                Err(_) => body,
            };
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok((status.as_u16(), body))
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let (_, body) = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body, e
            );
            RemoteError::Decode(e)
        })
    }

    fn to_record(kind: EntityKind, value: Value) -> Result<PlanRecord> {
        Ok(PlanRecord::from_entity_json(kind, value)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plan resources
    // ─────────────────────────────────────────────────────────────────────────

    /// GET /{resource}
    pub async fn list_records(&self, kind: EntityKind) -> Result<Vec<PlanRecord>> {
        let url = self.url(resource_path(kind));
        debug!("Listing {} from {}", kind, url);

        let response = self.client.get(&url).headers(self.headers()?).send().await?;
        let values: Vec<Value> = Self::parse_response(response).await?;
        values
            .into_iter()
            .map(|value| Self::to_record(kind, value))
            .collect()
    }

    /// GET /{resource}/{id}
    pub async fn get_record(&self, kind: EntityKind, id: &str) -> Result<PlanRecord> {
        let url = self.record_url(kind, id);

        let response = self.client.get(&url).headers(self.headers()?).send().await?;
        let value: Value = Self::parse_response(response).await?;
        Self::to_record(kind, value)
    }

    /// POST /{resource}
    ///
    /// Returns the record as stored by the service, which may carry a new id.
    pub async fn create_record(&self, record: &PlanRecord) -> Result<PlanRecord> {
        let kind = record.kind();
        let url = self.url(resource_path(kind));
        debug!("Creating {} '{}'", kind, record.display_name());

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&record.to_entity_json()?)
            .send()
            .await?;
        let value: Value = Self::parse_response(response).await?;
        Self::to_record(kind, value)
    }

    /// PUT /{resource}/{id}
    ///
    /// An empty success body echoes back the record that was sent.
    pub async fn update_record(&self, record: &PlanRecord) -> Result<PlanRecord> {
        let kind = record.kind();
        let url = self.record_url(kind, record.id());
        debug!("Updating {} {}", kind, record.id());

        let response = self
            .client
            .put(&url)
            .headers(self.headers()?)
            .json(&record.to_entity_json()?)
            .send()
            .await?;
        let (_, body) = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(record.clone());
        }
        Self::to_record(kind, serde_json::from_str(&body)?)
    }

    /// DELETE /{resource}/{id}
    pub async fn delete_record(&self, kind: EntityKind, id: &str) -> Result<()> {
        let url = self.record_url(kind, id);
        debug!("Deleting {} {}", kind, id);

        let response = self
            .client
            .delete(&url)
            .headers(self.headers()?)
            .send()
            .await?;
        Self::read_body(response).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Audit
    // ─────────────────────────────────────────────────────────────────────────

    /// POST /intents/events
    pub async fn post_audit_event(&self, event: &IntentAuditEvent) -> Result<()> {
        let url = self.url(AUDIT_EVENTS_PATH);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(event)
            .send()
            .await?;
        Self::read_body(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PlanRepositoryTrait for PlanApiClient {
    async fn list(&self, kind: EntityKind) -> wealthplan_core::Result<Vec<PlanRecord>> {
        self.list_records(kind)
            .await
            .map_err(|e| e.into_persistence(resource_path(kind), "list").into())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> wealthplan_core::Result<PlanRecord> {
        self.get_record(kind, id)
            .await
            .map_err(|e| e.into_persistence(resource_path(kind), "get").into())
    }

    async fn create(&self, record: &PlanRecord) -> wealthplan_core::Result<PlanRecord> {
        self.create_record(record)
            .await
            .map_err(|e| e.into_persistence(resource_path(record.kind()), "create").into())
    }

    async fn update(&self, record: &PlanRecord) -> wealthplan_core::Result<PlanRecord> {
        self.update_record(record)
            .await
            .map_err(|e| e.into_persistence(resource_path(record.kind()), "update").into())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> wealthplan_core::Result<()> {
        self.delete_record(kind, id)
            .await
            .map_err(|e| e.into_persistence(resource_path(kind), "delete").into())
    }
}

#[async_trait]
impl IntentAuditSink for PlanApiClient {
    async fn record(&self, event: &IntentAuditEvent) -> wealthplan_core::Result<()> {
        self.post_audit_event(event)
            .await
            .map_err(|e| e.into_persistence(AUDIT_EVENTS_PATH, "create").into())
    }
}
