use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::ChatbotApi;
use crate::errors::{ChatbotError, ChatbotResult};
use crate::query::{build_user_query, format_parameters, validate_parameters};
use crate::question::QuestionId;
use crate::toast::{Notifier, ToastOptions};
use crate::types::{ChatbotQuery, QueryResult, RawParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Bot,
    /// Placeholder where the question buttons are shown
    ActionButtons,
}

/// One entry in the chat transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub reaction: Option<String>,
}

impl Message {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
            reaction: None,
        }
    }
}

/// A conversation with the attendance assistant
pub struct ChatSession {
    api: Arc<dyn ChatbotApi>,
    notifier: Notifier,
    user_name: Option<String>,
    strict_validation: bool,
    messages: Vec<Message>,
    follow_ups: Vec<String>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn ChatbotApi>, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            user_name: None,
            strict_validation: false,
            messages: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    pub fn with_user_name(mut self, name: Option<String>) -> Self {
        self.user_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn follow_ups(&self) -> &[String] {
        &self.follow_ups
    }

    /// Greets the user the first time the session is opened
    pub fn open(&mut self) {
        if !self.messages.is_empty() {
            return;
        }
        let name = self.user_name.as_deref().unwrap_or("there");
        self.messages.push(Message::new(
            MessageKind::Bot,
            format!(
                "👋 Hello {}! I'm your AI attendance assistant. How can I help you today?",
                name
            ),
        ));
        self.messages
            .push(Message::new(MessageKind::ActionButtons, String::new()));
    }

    fn check_parameters(&self, question_id: QuestionId, raw: &RawParameters) -> ChatbotResult<()> {
        if self.strict_validation {
            return validate_parameters(question_id, raw);
        }
        let project_missing = raw.get("project").map_or(true, |p| p.trim().is_empty());
        if question_id == QuestionId::ProjectHoursMonth && project_missing {
            return Err(ChatbotError::MissingParameter {
                question: question_id.to_string(),
                name: "project".to_string(),
            });
        }
        Ok(())
    }

    /// Asks a question and records both sides of the exchange.
    ///
    /// Returns the bot's reply, or the error notice appended in its place.
    /// Fails only when the parameters are rejected before sending.
    pub async fn ask(
        &mut self,
        question_id: QuestionId,
        raw: &RawParameters,
    ) -> ChatbotResult<&Message> {
        if let Err(e) = self.check_parameters(question_id, raw) {
            self.notifier.warning(
                ToastOptions::new("Missing Information").description(missing_hint(&e)),
            );
            return Err(e);
        }

        let user_query = build_user_query(question_id, raw);
        let parameters = format_parameters(question_id, raw);
        self.messages
            .push(Message::new(MessageKind::User, user_query.clone()));

        let query = ChatbotQuery::new(question_id, user_query, parameters);
        debug!(question = %question_id, "Asking chatbot");

        let reply = match self.api.send_query(&query).await {
            QueryResult::Success(data) => {
                self.follow_ups = question_id
                    .spec()
                    .follow_ups
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                Message::new(MessageKind::Bot, data.response)
            }
            QueryResult::Failure { error } => {
                info!(question = %question_id, error = %error, "Chatbot returned an error");
                self.notifier
                    .error(ToastOptions::new("Error").description(error.clone()));
                Message::new(
                    MessageKind::Bot,
                    format!("❌ Sorry, I encountered an error: {}", error),
                )
            }
        };

        self.messages.push(reply);
        self.messages
            .last()
            .ok_or_else(|| ChatbotError::ResponseError("Transcript is empty".to_string()))
    }

    /// Toggles a reaction on a message; returns false for unknown ids
    pub fn toggle_reaction(&mut self, message_id: Uuid, reaction: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                message.reaction = if message.reaction.as_deref() == Some(reaction) {
                    None
                } else {
                    Some(reaction.to_string())
                };
                true
            }
            None => false,
        }
    }

    /// Returns a message's text for copying and confirms with a short toast
    pub fn copy_message(&self, message_id: Uuid) -> Option<String> {
        let message = self.messages.iter().find(|m| m.id == message_id)?;
        self.notifier.success(
            ToastOptions::new("Copied!")
                .description("Message copied to clipboard")
                .duration(Duration::from_millis(2000)),
        );
        Some(message.content.clone())
    }
}

fn missing_hint(error: &ChatbotError) -> String {
    match error {
        ChatbotError::MissingParameter { name, .. } if name == "project" => {
            "Please select a project".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::{RecordingToaster, ToastKind};
    use crate::types::{QueryResponseData, QuestionsResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        fail_with: Option<String>,
        sent: Mutex<Vec<ChatbotQuery>>,
    }

    #[async_trait]
    impl ChatbotApi for FakeApi {
        async fn send_query(&self, query: &ChatbotQuery) -> QueryResult {
            self.sent.lock().unwrap().push(query.clone());
            match &self.fail_with {
                Some(error) => QueryResult::failure(error.clone()),
                None => QueryResult::Success(QueryResponseData {
                    question_id: Some(query.question_id.to_string()),
                    response: format!("Answer to: {}", query.user_query),
                    timestamp: None,
                }),
            }
        }

        async fn get_questions(&self) -> QuestionsResult {
            QuestionsResult::Success(Vec::new())
        }
    }

    fn session(api: Arc<FakeApi>) -> (ChatSession, Arc<RecordingToaster>) {
        let toaster = Arc::new(RecordingToaster::new());
        let session = ChatSession::new(api, Notifier::new(toaster.clone()));
        (session, toaster)
    }

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_open_greets_once() {
        let (session, _) = session(Arc::new(FakeApi::default()));
        let mut session = session.with_user_name(Some("Aiko".to_string()));

        session.open();
        session.open();

        assert_eq!(session.messages().len(), 2);
        assert!(session.messages()[0].content.contains("Hello Aiko!"));
        assert_eq!(session.messages()[1].kind, MessageKind::ActionButtons);
    }

    #[tokio::test]
    async fn test_successful_question_is_recorded() {
        let api = Arc::new(FakeApi::default());
        let (mut session, toaster) = session(api.clone());

        let reply = session
            .ask(
                QuestionId::AttendanceSummaryMonth,
                &raw(&[("month", "2024-03")]),
            )
            .await
            .unwrap();
        assert_eq!(reply.kind, MessageKind::Bot);
        assert_eq!(
            reply.content,
            "Answer to: Show my attendance for March 2024"
        );

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].kind, MessageKind::User);
        assert_eq!(session.follow_ups()[0], "Show me overtime for this month");
        assert!(toaster.toasts().is_empty());

        let sent = api.sent.lock().unwrap();
        let params = sent[0].parameters.as_ref().unwrap();
        assert_eq!(params.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_becomes_error_message_and_toast() {
        let api = Arc::new(FakeApi {
            fail_with: Some("Service unavailable".to_string()),
            ..Default::default()
        });
        let (mut session, toaster) = session(api);

        let reply = session
            .ask(QuestionId::LeaveBalance, &RawParameters::new())
            .await
            .unwrap();
        assert_eq!(
            reply.content,
            "❌ Sorry, I encountered an error: Service unavailable"
        );
        assert!(session.follow_ups().is_empty());

        let toasts = toaster.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_project_is_required_for_project_hours() {
        let api = Arc::new(FakeApi::default());
        let (mut session, toaster) = session(api.clone());

        let err = session
            .ask(
                QuestionId::ProjectHoursMonth,
                &raw(&[("month", "2024-03"), ("project", " ")]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChatbotError::MissingParameter { .. }));
        assert!(session.messages().is_empty());
        assert!(api.sent.lock().unwrap().is_empty());
        assert_eq!(
            toaster.toasts()[0].description.as_deref(),
            Some("Please select a project")
        );
    }

    #[tokio::test]
    async fn test_strict_validation_rejects_bad_month() {
        let api = Arc::new(FakeApi::default());
        let (session, _) = session(api.clone());
        let mut session = session.with_strict_validation(true);

        let result = session
            .ask(QuestionId::OvertimeAnalysisMonth, &raw(&[("month", "2024-13")]))
            .await;

        assert!(matches!(result, Err(ChatbotError::InvalidParameter { .. })));
        assert!(api.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reactions_toggle() {
        let (mut session, _) = session(Arc::new(FakeApi::default()));
        session.open();
        let id = session.messages()[0].id;

        assert!(session.toggle_reaction(id, "👍"));
        assert_eq!(session.messages()[0].reaction.as_deref(), Some("👍"));
        assert!(session.toggle_reaction(id, "👍"));
        assert_eq!(session.messages()[0].reaction, None);
        assert!(!session.toggle_reaction(Uuid::new_v4(), "👍"));
    }

    #[test]
    fn test_copy_message_confirms() {
        let (mut session, toaster) = session(Arc::new(FakeApi::default()));
        session.open();
        let id = session.messages()[0].id;

        let text = session.copy_message(id).unwrap();
        assert!(text.starts_with("👋 Hello there!"));
        assert_eq!(toaster.toasts()[0].duration, Some(Duration::from_millis(2000)));
    }
}
