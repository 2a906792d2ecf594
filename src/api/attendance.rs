use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::model::{AttendancePage, AttendanceQuery, AttendanceRecord, AttendanceUpdate};

/// The attendance endpoints of the HR API, as seen from the widget.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// Today's record for the signed-in employee. `Ok(None)` only when the
    /// server says there is none (404); every other failure is an error.
    async fn today(&self) -> Result<Option<AttendanceRecord>, ApiError>;

    async fn clock_in(&self) -> Result<AttendanceRecord, ApiError>;

    async fn clock_out(&self) -> Result<AttendanceRecord, ApiError>;

    async fn history(&self, query: &AttendanceQuery) -> Result<AttendancePage, ApiError>;

    async fn record(&self, id: u64) -> Result<AttendanceRecord, ApiError>;

    /// HR/admin only.
    async fn update_record(
        &self,
        id: u64,
        update: &AttendanceUpdate,
    ) -> Result<AttendanceRecord, ApiError>;
}

/// Error payloads look like `{"error": "..."}` or `{"message": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HttpAttendanceApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAttendanceApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_url,
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });

            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

#[async_trait]
impl AttendanceApi for HttpAttendanceApi {
    #[instrument(name = "attendance_today", skip(self))]
    async fn today(&self) -> Result<Option<AttendanceRecord>, ApiError> {
        match self
            .send(self.request(Method::GET, "/attendance/today"))
            .await
        {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => {
                debug!("No attendance record for today");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Fetching today's attendance failed");
                Err(e)
            }
        }
    }

    #[instrument(name = "attendance_clock_in", skip(self))]
    async fn clock_in(&self) -> Result<AttendanceRecord, ApiError> {
        self.send(self.request(Method::POST, "/attendance/clock-in"))
            .await
    }

    #[instrument(name = "attendance_clock_out", skip(self))]
    async fn clock_out(&self) -> Result<AttendanceRecord, ApiError> {
        self.send(self.request(Method::POST, "/attendance/clock-out"))
            .await
    }

    #[instrument(name = "attendance_history", skip(self))]
    async fn history(&self, query: &AttendanceQuery) -> Result<AttendancePage, ApiError> {
        self.send(self.request(Method::GET, "/attendance").query(query))
            .await
    }

    #[instrument(name = "attendance_record", skip(self))]
    async fn record(&self, id: u64) -> Result<AttendanceRecord, ApiError> {
        self.send(self.request(Method::GET, &format!("/attendance/{id}")))
            .await
    }

    #[instrument(name = "attendance_update", skip(self, update))]
    async fn update_record(
        &self,
        id: u64,
        update: &AttendanceUpdate,
    ) -> Result<AttendanceRecord, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/attendance/{id}"))
                .json(update),
        )
        .await
    }
}
