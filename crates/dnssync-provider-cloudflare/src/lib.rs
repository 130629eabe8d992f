// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `DnsProvider` for
// dnssync.
//
// ## Behavior
//
// - One HTTP request per provider call, except the zone listing which
//   follows pagination until every page is read
// - Errors are propagated to the engine unchanged; no retry, no backoff
// - HTTP timeout configured (30 seconds)
// - Specific error messages for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - A `success: false` envelope is an error even with a 2xx status
// - Dry-run mode: reads are real, writes are logged and skipped
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider fails fast if token or zone ID is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=N&per_page=100`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dnssync_core::config::ProviderConfig;
use dnssync_core::traits::DnsProvider;
use dnssync_core::{Error, LiveRecord, RecordDefinition, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per page when listing the zone
const PAGE_SIZE: u32 = 100;

/// Id reported for records "created" in dry-run mode
pub const DRY_RUN_ID: &str = "dry-run";

/// Cloudflare v4 response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: Option<u32>,
}

impl<T> ApiResponse<T> {
    fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "no error details".to_string();
        }

        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("[{}] {}", code, e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Cloudflare DNS provider
///
/// Stateless apart from its HTTP client. Every call targets the single
/// configured zone.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the zone listing
/// - Log the intended POST/PATCH/DELETE with its payload
/// - **NOT** modify DNS records
/// - Return a record synthesized from the definition
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone holding every managed record
    zone_id: String,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider against the public API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone holding the managed records
    /// - `dry_run`: If true, list records but skip writes
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the token or zone ID is empty, or the HTTP
    /// client cannot be built.
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        let zone_id = zone_id.into();

        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            zone_id,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Point the provider at another API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a provider from its configuration
    pub fn from_config(config: &ProviderConfig, dry_run: bool) -> Result<Self> {
        config.validate()?;

        match config {
            ProviderConfig::Cloudflare {
                api_token,
                zone_id,
                base_url,
            } => {
                if dry_run {
                    tracing::warn!(
                        "Cloudflare provider running in DRY-RUN mode - no changes will be made"
                    );
                }

                let provider = Self::new(api_token.clone(), zone_id.clone(), dry_run)?;
                Ok(match base_url {
                    Some(url) => provider.with_base_url(url.clone()),
                    None => provider,
                })
            }
        }
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, self.zone_id)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.records_url(), id)
    }

    /// Request body for create and update
    ///
    /// TTL and proxy flag are always sent with defaults applied; priority
    /// only when the definition carries one.
    fn payload(record: &RecordDefinition) -> Value {
        let mut payload = serde_json::json!({
            "type": record.record_type.as_str(),
            "name": record.name,
            "content": record.content,
            "ttl": record.effective_ttl(),
            "proxied": record.effective_proxied(),
        });

        if let Some(priority) = record.priority {
            payload["priority"] = Value::from(priority);
        }

        payload
    }

    /// Record returned by writes skipped in dry-run mode
    fn synthesize(id: &str, record: &RecordDefinition) -> LiveRecord {
        LiveRecord {
            id: id.to_string(),
            name: record.name.clone(),
            record_type: record.record_type.to_string(),
            content: record.content.clone(),
            ttl: Some(record.effective_ttl()),
            proxied: Some(record.effective_proxied()),
            priority: record.priority,
        }
    }

    /// Send a request and unwrap the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<ApiResponse<T>> {
        let response = request
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &error_text, action));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            Error::provider("cloudflare", format!("Failed to parse response: {}", e))
        })?;

        if !envelope.success {
            return Err(Error::provider(
                "cloudflare",
                format!("{} failed: {}", action, envelope.error_summary()),
            ));
        }

        Ok(envelope)
    }
}

/// Map a non-success HTTP status to a provider error
fn status_error(status: StatusCode, error_text: &str, action: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("{} failed: resource not found. Status: {}", action, status),
        409 => format!(
            "Conflict: {} rejected by Cloudflare. Status: {} - {}",
            action, status, error_text
        ),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!(
            "Cloudflare server error (transient): {} - {}",
            status, error_text
        ),
        _ => format!("{} failed: {} - {}", action, status, error_text),
    };

    Error::provider("cloudflare", message)
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List every record in the zone
    ///
    /// # API Calls
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=1&per_page=100
    /// GET /zones/:zone_id/dns_records?page=2&per_page=100
    /// ...
    /// ```
    async fn list_records(&self) -> Result<Vec<LiveRecord>> {
        let url = self.records_url();
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!("Listing DNS records, page {}", page);

            let request = self
                .client
                .get(&url)
                .query(&[("page", page), ("per_page", PAGE_SIZE)]);
            let envelope: ApiResponse<Vec<LiveRecord>> =
                self.send(request, "List DNS records").await?;

            let total_pages = envelope
                .result_info
                .as_ref()
                .and_then(|info| info.total_pages)
                .unwrap_or(1);
            records.extend(envelope.result.unwrap_or_default());

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!("Listed {} DNS records", records.len());
        Ok(records)
    }

    async fn create_record(&self, record: &RecordDefinition) -> Result<LiveRecord> {
        let payload = Self::payload(record);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                self.records_url(),
                payload
            );
            return Ok(Self::synthesize(DRY_RUN_ID, record));
        }

        tracing::info!("Creating DNS record: {}", record.identity());
        let request = self.client.post(self.records_url()).json(&payload);
        let envelope: ApiResponse<LiveRecord> = self.send(request, "Create DNS record").await?;

        envelope.result.ok_or_else(|| {
            Error::provider("cloudflare", "Invalid response format: missing created record")
        })
    }

    async fn update_record(&self, id: &str, record: &RecordDefinition) -> Result<LiveRecord> {
        let url = self.record_url(id);
        let payload = Self::payload(record);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                payload
            );
            return Ok(Self::synthesize(id, record));
        }

        tracing::info!("Updating DNS record {}: {}", id, record.identity());
        let request = self.client.patch(&url).json(&payload);
        let envelope: ApiResponse<LiveRecord> = self.send(request, "Update DNS record").await?;

        envelope.result.ok_or_else(|| {
            Error::provider("cloudflare", "Invalid response format: missing updated record")
        })
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        let url = self.record_url(id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", url);
            return Ok(());
        }

        tracing::info!("Deleting DNS record {}", id);
        let request = self.client.delete(&url);
        let _: ApiResponse<Value> = self.send(request, "Delete DNS record").await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
