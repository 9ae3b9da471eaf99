use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::question::QuestionId;

/// Parameter values as collected from the user, keyed by parameter name
pub type RawParameters = BTreeMap<String, String>;

/// Parameter payload in the shape the query endpoint expects
pub type FormattedParameters = BTreeMap<String, ParamValue>;

/// A single formatted parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(i64::from(value))
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Number(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Request body for `POST /chatbot/query`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotQuery {
    pub question_id: QuestionId,
    pub user_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<FormattedParameters>,
}

impl ChatbotQuery {
    /// Builds a query, leaving `parameters` out entirely when there are none
    pub fn new(
        question_id: QuestionId,
        user_query: String,
        parameters: FormattedParameters,
    ) -> Self {
        Self {
            question_id,
            user_query,
            parameters: if parameters.is_empty() {
                None
            } else {
                Some(parameters)
            },
        }
    }
}

/// Payload of a successful query
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponseData {
    #[serde(default)]
    pub question_id: Option<String>,
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response envelope returned by `POST /chatbot/query`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatbotResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<QueryResponseData>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Question template served by `GET /chatbot/questions`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuestionTemplate {
    pub id: String,
    pub question: String,
    pub category: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

/// Response envelope returned by `GET /chatbot/questions`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<QuestionTemplate>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Only the error field of a failed response body
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a dispatched query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Success(QueryResponseData),
    Failure { error: String },
}

impl QueryResult {
    pub fn failure(error: impl Into<String>) -> Self {
        QueryResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success(_))
    }

    /// The bot's answer, if the query succeeded
    pub fn response(&self) -> Option<&str> {
        match self {
            QueryResult::Success(data) => Some(&data.response),
            QueryResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryResult::Success(_) => None,
            QueryResult::Failure { error } => Some(error),
        }
    }

    /// Collapses a response envelope. `success` without `data` is treated as a failure.
    pub(crate) fn from_response(response: ChatbotResponse, fallback: &str) -> Self {
        match (response.success, response.data) {
            (true, Some(data)) => QueryResult::Success(data),
            (_, _) => QueryResult::failure(non_blank_or(response.error, fallback)),
        }
    }
}

/// Outcome of fetching the question templates
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionsResult {
    Success(Vec<QuestionTemplate>),
    Failure { error: String },
}

impl QuestionsResult {
    pub fn failure(error: impl Into<String>) -> Self {
        QuestionsResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QuestionsResult::Success(_))
    }

    pub(crate) fn from_response(response: QuestionsResponse, fallback: &str) -> Self {
        match (response.success, response.data) {
            (true, Some(data)) => QuestionsResult::Success(data),
            (true, None) => QuestionsResult::Success(Vec::new()),
            (false, _) => QuestionsResult::failure(non_blank_or(response.error, fallback)),
        }
    }
}

pub(crate) fn non_blank_or(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
