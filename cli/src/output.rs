use attendance_core::i18n::Language;
use attendance_core::shortcuts::{group_by_category, Platform, Shortcut};
use attendance_core::toast::{Toast, ToastId, ToastKind, Toaster};
use attendance_core::QuestionTemplate;
use colored::*;
use pulldown_cmark::{Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};
use std::sync::atomic::{AtomicU64, Ordering};

/// Print the assistant's reply to the terminal
pub fn print_bot_response(response: &str) {
    println!("{}: {}", "Assistant".blue().bold(), render_markdown(response).trim_end());
}

pub fn print_user_query(query: &str) {
    println!("{}: {}", "You".green().bold(), query);
}

pub fn print_follow_ups(follow_ups: &[String]) {
    if follow_ups.is_empty() {
        return;
    }
    println!("{}", "You might also ask:".dimmed());
    for suggestion in follow_ups {
        println!("  {} {}", "›".dimmed(), suggestion.italic());
    }
}

pub fn print_templates(templates: &[QuestionTemplate]) {
    if templates.is_empty() {
        println!("{}", "The server offers no question templates.".yellow());
        return;
    }

    let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);
    for template in templates {
        let params = if template.parameters.is_empty() {
            String::new()
        } else {
            format!(" [{}]", template.parameters.join(", "))
        };
        println!(
            "  {}  {} {}{}",
            format!("{:width$}", template.id, width = width).cyan(),
            template.question,
            format!("({})", template.category).dimmed(),
            params.yellow()
        );
    }
}

pub fn print_language(current: Language) {
    let buttons: Vec<String> = Language::ALL
        .iter()
        .map(|language| {
            if *language == current {
                format!("[{}]", language.label()).on_blue().white().bold().to_string()
            } else {
                format!(" {} ", language.label()).dimmed().to_string()
            }
        })
        .collect();
    println!("🌐 {}", buttons.join(" "));
}

pub fn print_shortcuts(shortcuts: &[Shortcut], platform: Platform) {
    println!("{}", "Keyboard Shortcuts".bold());
    for (category, entries) in group_by_category(shortcuts) {
        println!();
        println!("{}", category.title().cyan().bold());
        for shortcut in entries {
            let keys = shortcut
                .display_keys(platform)
                .iter()
                .map(|k| format!("[{}]", k))
                .collect::<Vec<_>>()
                .join(" + ");
            println!("  {:<24} {}", shortcut.description, keys.yellow());
        }
    }
}

/// Show usage instructions when no command is given
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "attendance ask <question> [--month YYYY-MM]".green().bold());
    println!("    Ask a single question");
    println!();
    println!("  {}", "attendance chat".green().bold());
    println!("    Start an interactive chat session");
    println!();
    println!("{}", "Questions:".cyan());
    for id in attendance_core::QuestionId::ALL {
        println!("  {:<26} {}", id.as_str(), id.spec().description);
    }
    println!();
    println!("{}", "Options:".cyan());
    println!("  --base-url <URL>     Attendance API base URL");
    println!("  --language <en|ja>   Interface language");
    println!("  --help               Show this help message");
    println!();
}

/// Prints toasts as single coloured lines on stderr
#[derive(Debug, Default)]
pub struct TerminalToaster {
    next_id: AtomicU64,
}

impl Toaster for TerminalToaster {
    fn create(&self, toast: Toast) -> ToastId {
        let title = match toast.kind {
            ToastKind::Success => toast.title.green().bold(),
            ToastKind::Error => toast.title.red().bold(),
            ToastKind::Warning => toast.title.yellow().bold(),
            ToastKind::Info | ToastKind::Loading => toast.title.cyan().bold(),
        };
        match &toast.description {
            Some(description) => eprintln!("{} {}", title, description),
            None => eprintln!("{}", title),
        }
        if let Some(action) = &toast.action {
            eprintln!("  {} {}", "→".dimmed(), action.label.underline());
        }
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Render the markdown subset the assistant uses (headings, emphasis, lists)
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut output = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut list_depth = 0usize;

    for event in MdParser::new_ext(markdown, options) {
        match event {
            MdEvent::Start(Tag::Heading(level, ..)) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                if level == HeadingLevel::H1 {
                    output.push_str(&format!("{} ", "#".bright_cyan().bold()));
                }
                bold = true;
            }
            MdEvent::End(Tag::Heading(..)) => {
                bold = false;
                output.push('\n');
            }
            MdEvent::Start(Tag::Paragraph) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Paragraph) => output.push('\n'),
            MdEvent::Start(Tag::Strong) => bold = true,
            MdEvent::End(Tag::Strong) => bold = false,
            MdEvent::Start(Tag::Emphasis) => italic = true,
            MdEvent::End(Tag::Emphasis) => italic = false,
            MdEvent::Start(Tag::List(_)) => list_depth += 1,
            MdEvent::End(Tag::List(_)) => list_depth = list_depth.saturating_sub(1),
            MdEvent::Start(Tag::Item) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                output.push_str(&format!("{} ", "•".yellow()));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Text(text) => {
                let styled = match (bold, italic) {
                    (true, true) => text.bold().italic().to_string(),
                    (true, false) => text.bold().to_string(),
                    (false, true) => text.italic().to_string(),
                    (false, false) => text.to_string(),
                };
                output.push_str(&styled);
            }
            MdEvent::Code(code) => output.push_str(&code.on_bright_black().to_string()),
            MdEvent::SoftBreak | MdEvent::HardBreak => output.push('\n'),
            _ => {}
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_plain_text_and_lists() {
        colored::control::set_override(false);

        let rendered = render_markdown("Your March summary:\n\n- Worked: 20 days\n- Leave: 1 day");
        assert!(rendered.contains("Your March summary:"));
        assert!(rendered.contains("• Worked: 20 days"));
        assert!(rendered.contains("• Leave: 1 day"));
    }

    #[test]
    fn test_terminal_toaster_ids_increase() {
        let toaster = TerminalToaster::default();
        let toast = Toast::new(
            ToastKind::Info,
            attendance_core::toast::ToastOptions::new("Hello"),
        );
        let first = toaster.create(toast.clone());
        let second = toaster.create(toast);
        assert!(second > first);
    }
}
