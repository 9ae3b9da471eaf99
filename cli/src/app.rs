use anyhow::{Context, Result};
use attendance_core::query::{default_parameters, month_options};
use attendance_core::session::{ChatSession, MessageKind};
use attendance_core::{
    ChatbotApi, ChatbotClient, ParamKind, QueryResult, QuestionId, QuestionsResult, RawParameters,
};
use chrono::Local;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

use crate::output::{print_bot_response, print_follow_ups, print_templates, print_user_query};

/// Runs `future` behind a spinner
async fn with_spinner<T>(message: &str, future: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Sends one question and prints the exchange
pub async fn run_single_query(
    client: &ChatbotClient,
    question_id: QuestionId,
    raw: RawParameters,
) -> Result<()> {
    info!(question = %question_id, "Running single query");
    print_user_query(&attendance_core::build_user_query(question_id, &raw));

    let result = with_spinner("Processing request...", client.dispatch(question_id, &raw)).await;
    match result {
        QueryResult::Success(data) => {
            print_bot_response(&data.response);
            let follow_ups: Vec<String> = question_id
                .spec()
                .follow_ups
                .iter()
                .map(|s| s.to_string())
                .collect();
            print_follow_ups(&follow_ups);
            Ok(())
        }
        QueryResult::Failure { error } => {
            error!("Chatbot query failed: {}", error);
            anyhow::bail!("Sorry, I encountered an error: {}", error)
        }
    }
}

/// Lists the question templates the server offers
pub async fn list_questions(client: &ChatbotClient) -> Result<()> {
    match with_spinner("Fetching questions...", client.get_questions()).await {
        QuestionsResult::Success(templates) => {
            print_templates(&templates);
            Ok(())
        }
        QuestionsResult::Failure { error } => anyhow::bail!("{}", error),
    }
}

/// Prompts for each parameter the question takes, pre-filled with defaults
fn prompt_parameters(question_id: QuestionId, theme: &ColorfulTheme) -> Result<RawParameters> {
    let today = Local::now().date_naive();
    let mut raw = default_parameters(question_id, today, &[]);

    for param in question_id.spec().parameters {
        let current = raw.get(param.name).cloned().unwrap_or_default();
        let value = match param.kind {
            ParamKind::Month => {
                let options = month_options(today);
                let labels: Vec<String> = options.iter().map(|m| m.label()).collect();
                let selected = options
                    .iter()
                    .position(|m| m.to_string() == current)
                    .unwrap_or(options.len().saturating_sub(3));
                let choice = Select::with_theme(theme)
                    .with_prompt(param.name)
                    .items(&labels)
                    .default(selected)
                    .interact()
                    .context("Failed to read month selection")?;
                options[choice].to_string()
            }
            ParamKind::Date | ParamKind::Text => Input::<String>::with_theme(theme)
                .with_prompt(param.name)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()
                .context("Failed to read parameter")?,
        };
        raw.insert(param.name.to_string(), value);
    }

    Ok(raw)
}

/// Runs an interactive chat session driven by a question menu
pub async fn run_interactive_chat(mut session: ChatSession) -> Result<()> {
    let theme = ColorfulTheme::default();
    session.open();

    for message in session.messages() {
        if message.kind == MessageKind::Bot {
            print_bot_response(&message.content);
        }
    }
    println!();

    let mut items: Vec<String> = QuestionId::ALL
        .iter()
        .map(|id| format!("{}: {}", id.spec().label, id.spec().description))
        .collect();
    items.push("Exit".to_string());

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to know?")
            .items(&items)
            .default(0)
            .interact()
            .context("Failed to read selection")?;

        let Some(question_id) = QuestionId::ALL.get(choice).copied() else {
            println!("Exiting chat session.");
            break;
        };

        let raw = if question_id.requires_params() {
            prompt_parameters(question_id, &theme)?
        } else {
            RawParameters::new()
        };

        let reply = with_spinner("Processing request...", session.ask(question_id, &raw)).await;
        match reply {
            Ok(message) => {
                let content = message.content.clone();
                if let Some(asked) = session
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| m.kind == MessageKind::User)
                {
                    print_user_query(&asked.content);
                }
                print_bot_response(&content);
                print_follow_ups(session.follow_ups());
            }
            // The session has already shown a warning toast
            Err(e) => info!(error = %e, "Question was not sent"),
        }
        println!();
    }

    Ok(())
}
