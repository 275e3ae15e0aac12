use std::time::Duration;

use reqwest::{Response, StatusCode};
use tracing::{info, warn};
use url::Url;

use crate::auth::User;
use crate::error::MediPredictError;
use crate::history::HistoryEntry;
use crate::inference::Prediction;

use super::types::*;

const USER_AGENT: &str = "MediPredict/1.0";
const CLEAR_SEGMENT: &str = "clear";

/// HTTP client for the optional prediction backend.
///
/// Every call is bounded by the configured timeout; timeouts, connection
/// failures and non-2xx statuses all come back as `MediPredictError::Remote`
/// (or `Unauthenticated` for 401/403) so callers can fall back to the local
/// engine and store.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RemoteClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MediPredictError> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|e| {
            MediPredictError::Config(format!("Invalid API URL '{}': {}", base_url, e))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| MediPredictError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the service root.
    pub fn endpoint(&self, path: &str) -> Result<Url, MediPredictError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| MediPredictError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Liveness check. Never fails: any error means "unavailable".
    pub async fn health(&self) -> bool {
        let url = match self.endpoint("api/health/") {
            Ok(url) => url,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };

        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Prediction service is available");
                true
            }
            Ok(response) => {
                warn!("Prediction service health check returned {}", response.status());
                false
            }
            Err(e) => {
                warn!("Prediction service unreachable: {}", e);
                false
            }
        }
    }

    /// `POST /api/predict/`
    pub async fn predict(
        &self,
        token: &str,
        symptoms: &[String],
    ) -> Result<Vec<Prediction>, MediPredictError> {
        let url = self.endpoint("api/predict/")?;
        info!("Requesting remote prediction for {} symptoms", symptoms.len());

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&PredictRequest { symptoms })
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response).await?;

        let predictions = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| MediPredictError::Remote(format!("Invalid prediction response: {}", e)))?
            .into_predictions();

        if predictions.is_empty() {
            return Err(MediPredictError::Remote(
                "Service returned no predictions".to_string(),
            ));
        }
        if let Some(bad) = predictions.iter().find(|p| !p.is_valid()) {
            return Err(MediPredictError::Remote(format!(
                "Service returned an invalid prediction for '{}' ({}%)",
                bad.condition, bad.probability
            )));
        }

        Ok(predictions)
    }

    /// `GET /api/predict/history/`
    pub async fn history(&self, token: &str) -> Result<Vec<HistoryEntry>, MediPredictError> {
        let url = self.endpoint("api/predict/history/")?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response).await?;

        let entries = response
            .json::<Vec<RemoteHistoryEntry>>()
            .await
            .map_err(|e| MediPredictError::Remote(format!("Invalid history response: {}", e)))?;

        let received = entries.len();
        let entries: Vec<HistoryEntry> = entries
            .into_iter()
            .filter(|e| e.predictions.iter().all(Prediction::is_valid))
            .map(HistoryEntry::from)
            .collect();
        if entries.len() < received {
            warn!(
                "Dropped {} remote history entries with out-of-range predictions",
                received - entries.len()
            );
        }

        Ok(entries)
    }

    /// `DELETE /api/predict/history/{id}/`
    ///
    /// `clear` is rejected: it names the clear-all route, not an entry.
    pub async fn delete_history(&self, token: &str, id: &str) -> Result<(), MediPredictError> {
        if id.is_empty() || id == CLEAR_SEGMENT {
            return Err(MediPredictError::Validation(format!(
                "'{}' is not a history entry id",
                id
            )));
        }
        let url = self.endpoint(&format!(
            "api/predict/history/{}/",
            urlencoding::encode(id)
        ))?;

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).await?;

        info!("Deleted remote history entry {}", id);
        Ok(())
    }

    /// `DELETE /api/predict/history/clear/`
    pub async fn clear_history(&self, token: &str) -> Result<(), MediPredictError> {
        let url = self.endpoint("api/predict/history/clear/")?;

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).await?;

        info!("Cleared remote history");
        Ok(())
    }

    /// `POST /api/auth/login/`, returning the bearer token and the user.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, User), MediPredictError> {
        let url = self.endpoint("api/auth/login/")?;

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response).await?;

        let login = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| MediPredictError::Remote(format!("Invalid login response: {}", e)))?;

        Ok((login.token, login.user.into()))
    }
}

fn request_error(e: reqwest::Error) -> MediPredictError {
    if e.is_timeout() {
        MediPredictError::Remote(format!("Request timed out: {}", e))
    } else {
        MediPredictError::Remote(format!("Request failed: {}", e))
    }
}

/// Pass 2xx responses through; turn everything else into an error carrying
/// the service's `error` message when it sent one.
async fn check_status(response: Response) -> Result<Response, MediPredictError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| {
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            warn!("Prediction service rejected credentials: {}", message);
            Err(MediPredictError::Unauthenticated)
        }
        _ => Err(MediPredictError::Remote(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RemoteClient {
        RemoteClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_root() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.endpoint("api/predict/").unwrap().as_str(),
            "http://localhost:8000/api/predict/"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let c = client("https://example.com/backend");
        assert_eq!(c.base_url().as_str(), "https://example.com/backend/");
        assert_eq!(
            c.endpoint("/api/health/").unwrap().as_str(),
            "https://example.com/backend/api/health/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = RemoteClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MediPredictError::Config(_)));
    }

    #[tokio::test]
    async fn test_health_unreachable_is_false() {
        // Port 9 (discard) on localhost is closed in test environments.
        let c = client("http://127.0.0.1:9");
        assert!(!c.health().await);
    }
}
