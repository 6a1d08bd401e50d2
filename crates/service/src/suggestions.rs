//! Material suggestions from a remote text-generation service.
//!
//! The remote side is opaque: it takes a project description and a category
//! and answers with a list of strings. Whatever goes wrong there is logged
//! and turned into a "try again" outcome for the caller.

use std::time::Duration;

use async_trait::async_trait;
use models::suggestion::{SuggestionRequest, SuggestionResponse};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::ServiceError;

pub const SUGGESTION_FAILED: &str = "Failed to get suggestions. Please try again.";

#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, ServiceError>;
}

/// Calls a JSON endpoint: POST `{purchaseHistory, category}` → `{suggestions: [...]}`.
pub struct HttpSuggestionProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSuggestionProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Suggestion(e.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionProvider {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, ServiceError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Suggestion(e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::Suggestion(e.to_string()))?;
        let body = resp
            .json::<SuggestionResponse>()
            .await
            .map_err(|e| ServiceError::Suggestion(format!("unexpected response body: {e}")))?;
        Ok(body.suggestions)
    }
}

/// Stand-in when no endpoint is configured; every call fails.
pub struct UnconfiguredSuggestions;

#[async_trait]
impl SuggestionProvider for UnconfiguredSuggestions {
    async fn suggest(&self, _request: &SuggestionRequest) -> Result<Vec<String>, ServiceError> {
        Err(ServiceError::Suggestion("no suggestion endpoint configured".into()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SuggestionOutcome {
    Ready { suggestions: Vec<String> },
    Failed { error: String },
}

/// Validate the request, ask the provider, and fold any remote failure into
/// `SuggestionOutcome::Failed`. Only invalid input is returned as an error.
pub async fn request_suggestions(
    provider: &dyn SuggestionProvider,
    request: &SuggestionRequest,
) -> Result<SuggestionOutcome, ServiceError> {
    request.validate()?;
    match provider.suggest(request).await {
        Ok(suggestions) => {
            info!(event = "suggestions_ready", category = %request.category, count = suggestions.len(), "suggestions received");
            Ok(SuggestionOutcome::Ready { suggestions })
        }
        Err(e) => {
            error!(event = "suggestions_failed", category = %request.category, error = %e, "error fetching product suggestions");
            Ok(SuggestionOutcome::Failed { error: SUGGESTION_FAILED.to_string() })
        }
    }
}
