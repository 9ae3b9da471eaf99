use attendance_core::i18n::Language;
use attendance_core::{QuestionId, RawParameters};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Attendance assistant: ask the attendance chatbot from the terminal
#[derive(Parser, Debug)]
#[command(name = "attendance", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the attendance API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Interface language (en, ja)
    #[arg(long, global = true)]
    pub language: Option<Language>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question
    Ask {
        /// Question id, e.g. attendance_summary_month
        question: QuestionId,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// List the question templates offered by the server
    Questions,

    /// Start an interactive chat session
    Chat,

    /// Show or change the preferred language
    Language {
        /// Language to switch to (en, ja)
        #[arg(value_name = "LANGUAGE")]
        set: Option<Language>,
    },

    /// Show keyboard shortcuts
    Shortcuts {
        /// Show macOS key symbols
        #[arg(long, default_value_t = false)]
        mac: bool,
    },
}

/// Parameters for `ask`, in `YYYY-MM` / `YYYY-MM-DD` form
#[derive(ClapArgs, Debug, Default)]
pub struct ParamArgs {
    #[arg(long)]
    pub month: Option<String>,

    #[arg(long)]
    pub month1: Option<String>,

    #[arg(long)]
    pub month2: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub project: Option<String>,
}

impl ParamArgs {
    pub fn into_raw(self) -> RawParameters {
        [
            ("month", self.month),
            ("month1", self.month1),
            ("month2", self.month2),
            ("date", self.date),
            ("project", self.project),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
    }
}
