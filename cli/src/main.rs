use anyhow::{Context, Result};
use attendance_core::config::{get_default_config_dir, get_default_config_file, APP_NAME};
use attendance_core::i18n::{FilePreferenceStore, LanguageSwitcher, PreferenceStoreRef};
use attendance_core::session::ChatSession;
use attendance_core::shortcuts::{common_shortcuts, Platform};
use attendance_core::toast::Notifier;
use attendance_core::{ChatbotClient, ChatbotConfig};
use clap::Parser;
use colored::*;
use std::sync::Arc;
use tracing::{debug, error};

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::{Args, Commands};
use crate::output::{print_language, print_shortcuts, print_usage_instructions, TerminalToaster};

/// Resolves configuration: file, then environment, then command-line flags
fn load_config(args: &Args) -> Result<ChatbotConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file(APP_NAME).context("Failed to locate config file")?,
    };
    let file_config = ChatbotConfig::load_from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let from_args = ChatbotConfig {
        base_url: args.base_url.clone(),
        auth_token: args.token.clone(),
        log_level: args.log_level.clone(),
        language: args.language.map(|l| l.code().to_string()),
        ..Default::default()
    };

    Ok(file_config.with_env_overrides().merge(&from_args))
}

fn preference_store() -> Result<PreferenceStoreRef> {
    let dir = get_default_config_dir(APP_NAME).context("Failed to locate config directory")?;
    Ok(Arc::new(FilePreferenceStore::new(dir.join("preferences.toml"))))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a local .env, if any
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(&args)?;
    logging::init_tracing(config.log_level());
    debug!(base_url = config.base_url(), "Configuration loaded");

    let Some(command) = args.command else {
        print_usage_instructions();
        return Ok(());
    };

    let outcome = match command {
        Commands::Ask { question, params } => {
            let client = ChatbotClient::new(config)?;
            app::run_single_query(&client, question, params.into_raw()).await
        }
        Commands::Questions => {
            let client = ChatbotClient::new(config)?;
            app::list_questions(&client).await
        }
        Commands::Chat => {
            let user_name = config.user_name.clone();
            let strict = config.strict_validation();
            let client = Arc::new(ChatbotClient::new(config)?);
            let session = ChatSession::new(client, Notifier::new(Arc::new(TerminalToaster::default())))
                .with_user_name(user_name)
                .with_strict_validation(strict);
            app::run_interactive_chat(session).await
        }
        Commands::Language { set } => {
            let mut switcher =
                LanguageSwitcher::resolve(config.language.as_deref(), preference_store()?);
            if let Some(language) = set {
                switcher
                    .switch(language)
                    .context("Failed to save language preference")?;
                println!("Language set to {}", language.code().green().bold());
            }
            print_language(switcher.current());
            Ok(())
        }
        Commands::Shortcuts { mac } => {
            let platform = if mac || cfg!(target_os = "macos") {
                Platform::Mac
            } else {
                Platform::Other
            };
            print_shortcuts(&common_shortcuts(), platform);
            Ok(())
        }
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }

    Ok(())
}
