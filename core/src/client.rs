use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ChatbotConfig;
use crate::errors::{ChatbotError, ChatbotResult};
use crate::query::{build_user_query, format_parameters, validate_parameters};
use crate::question::QuestionId;
use crate::types::*;

const QUERY_FALLBACK: &str = "Failed to process query";
const RESPONSE_FALLBACK: &str = "Failed to get response";
const QUESTIONS_FALLBACK: &str = "Failed to fetch questions";

/// The remote chatbot endpoints. Implementations never fail: every error is
/// folded into the failure variant of the returned result.
#[async_trait]
pub trait ChatbotApi: Send + Sync {
    async fn send_query(&self, query: &ChatbotQuery) -> QueryResult;

    async fn get_questions(&self) -> QuestionsResult;
}

/// HTTP client for the chatbot endpoints
#[derive(Debug, Clone)]
pub struct ChatbotClient {
    client: Client,
    config: ChatbotConfig,
    base_url: Url,
}

impl ChatbotClient {
    /// Create a new chatbot API client
    pub fn new(config: ChatbotConfig) -> ChatbotResult<Self> {
        let mut raw_base = config.base_url().trim().to_string();
        if !raw_base.ends_with('/') {
            raw_base.push('/');
        }
        let base_url = Url::parse(&raw_base).map_err(|e| {
            ChatbotError::ConfigError(format!("Invalid base URL '{}': {}", config.base_url(), e))
        })?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ChatbotError::ConfigError(format!("Invalid auth token: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &ChatbotConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> ChatbotResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ChatbotError::ConfigError(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Turns a non-success status into an error carrying the server's message
    async fn error_from_status(response: reqwest::Response, fallback: &str) -> ChatbotError {
        let status_code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);

        ChatbotError::HttpError {
            status_code,
            message: non_blank_or(message, fallback),
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> ChatbotResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from_status(response, fallback).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ChatbotError::ParsingError(format!("Failed to parse response: {}", e)))
    }

    /// Posts a query and returns the raw envelope
    pub async fn post_query(&self, query: &ChatbotQuery) -> ChatbotResult<ChatbotResponse> {
        let url = self.endpoint("chatbot/query")?;
        debug!(question = %query.question_id, %url, "Sending chatbot query");

        let response = self
            .client
            .post(url)
            .json(query)
            .send()
            .await
            .map_err(|e| ChatbotError::RequestError(format!("Failed to send request: {}", e)))?;

        Self::read_json(response, QUERY_FALLBACK).await
    }

    /// Fetches the question templates and returns the raw envelope
    pub async fn fetch_questions(&self) -> ChatbotResult<QuestionsResponse> {
        let url = self.endpoint("chatbot/questions")?;
        debug!(%url, "Fetching question templates");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ChatbotError::RequestError(format!("Failed to send request: {}", e)))?;

        Self::read_json(response, QUESTIONS_FALLBACK).await
    }

    /// Builds the query text and payload from one parameter snapshot and sends them
    pub async fn dispatch(&self, question_id: QuestionId, raw: &RawParameters) -> QueryResult {
        if self.config.strict_validation() {
            if let Err(e) = validate_parameters(question_id, raw) {
                warn!(question = %question_id, error = %e, "Rejected query before dispatch");
                return QueryResult::failure(e.to_string());
            }
        }

        let query = ChatbotQuery::new(
            question_id,
            build_user_query(question_id, raw),
            format_parameters(question_id, raw),
        );
        ChatbotApi::send_query(self, &query).await
    }
}

/// Message shown to the user for an error that escaped the HTTP layer
fn failure_message(error: ChatbotError, fallback: &str) -> String {
    match error {
        ChatbotError::HttpError { message, .. } => message,
        other => non_blank_or(Some(other.to_string()), fallback),
    }
}

#[async_trait]
impl ChatbotApi for ChatbotClient {
    async fn send_query(&self, query: &ChatbotQuery) -> QueryResult {
        match self.post_query(query).await {
            Ok(response) => QueryResult::from_response(response, RESPONSE_FALLBACK),
            Err(e) => {
                warn!(question = %query.question_id, error = %e, "Chatbot query failed");
                QueryResult::failure(failure_message(e, QUERY_FALLBACK))
            }
        }
    }

    async fn get_questions(&self) -> QuestionsResult {
        match self.fetch_questions().await {
            Ok(response) => QuestionsResult::from_response(response, QUESTIONS_FALLBACK),
            Err(e) => {
                warn!(error = %e, "Fetching question templates failed");
                QuestionsResult::failure(failure_message(e, QUESTIONS_FALLBACK))
            }
        }
    }
}
