use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

/// Toast flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
    Loading,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Warning => "⚠️",
            ToastKind::Info => "ℹ️",
            ToastKind::Loading => "⏳",
        }
    }
}

/// A button attached to a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    pub label: String,
    /// Identifier handed back to the caller when the action is chosen
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub title: String,
    pub description: Option<String>,
    pub duration: Duration,
    pub action: Option<ToastAction>,
}

impl ToastOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            duration: DEFAULT_TOAST_DURATION,
            action: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn action(mut self, label: impl Into<String>, command: impl Into<String>) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            command: command.into(),
        });
        self
    }
}

/// A toast ready to be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    /// Loading toasts are shown as info toasts
    pub kind: ToastKind,
    /// `None` keeps the toast until it is dismissed
    pub duration: Option<Duration>,
    pub action: Option<ToastAction>,
}

impl Toast {
    pub fn new(kind: ToastKind, options: ToastOptions) -> Self {
        let loading = kind == ToastKind::Loading;
        Self {
            title: format!("{} {}", kind.icon(), options.title),
            description: options.description,
            kind: if loading { ToastKind::Info } else { kind },
            duration: if loading {
                None
            } else {
                Some(options.duration)
            },
            action: options.action,
        }
    }
}

pub type ToastId = u64;

/// Something that can display toasts
pub trait Toaster: Send + Sync + Debug {
    fn create(&self, toast: Toast) -> ToastId;
}

pub type ToasterRef = Arc<dyn Toaster>;

/// Convenience front for a [`Toaster`]
#[derive(Debug, Clone)]
pub struct Notifier {
    toaster: ToasterRef,
}

impl Notifier {
    pub fn new(toaster: ToasterRef) -> Self {
        Self { toaster }
    }

    pub fn show(&self, kind: ToastKind, options: ToastOptions) -> ToastId {
        self.toaster.create(Toast::new(kind, options))
    }

    pub fn success(&self, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Success, options)
    }

    pub fn error(&self, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Error, options)
    }

    pub fn warning(&self, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Warning, options)
    }

    pub fn info(&self, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Info, options)
    }

    pub fn loading(&self, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Loading, options)
    }

    pub fn quick_success(&self, title: &str, description: Option<&str>) -> ToastId {
        self.success(with_description(title, description))
    }

    pub fn quick_error(&self, title: &str, description: Option<&str>) -> ToastId {
        self.error(with_description(title, description))
    }

    pub fn quick_info(&self, title: &str, description: Option<&str>) -> ToastId {
        self.info(with_description(title, description))
    }
}

fn with_description(title: &str, description: Option<&str>) -> ToastOptions {
    let options = ToastOptions::new(title);
    match description {
        Some(d) => options.description(d),
        None => options,
    }
}

/// Keeps every toast it is given; useful for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingToaster {
    next_id: AtomicU64,
    toasts: RwLock<Vec<Toast>>,
}

impl RecordingToaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .read()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }
}

impl Toaster for RecordingToaster {
    fn create(&self, toast: Toast) -> ToastId {
        if let Ok(mut toasts) = self.toasts.write() {
            toasts.push(toast);
        }
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_gets_icon() {
        let toast = Toast::new(ToastKind::Success, ToastOptions::new("Copied!"));
        assert_eq!(toast.title, "✅ Copied!");
        assert_eq!(toast.duration, Some(DEFAULT_TOAST_DURATION));
    }

    #[test]
    fn test_loading_is_sticky_info() {
        let toast = Toast::new(
            ToastKind::Loading,
            ToastOptions::new("Fetching").duration(Duration::from_secs(1)),
        );
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(toast.duration, None);
        assert!(toast.title.starts_with("⏳"));
    }

    #[test]
    fn test_notifier_records_toasts() {
        let recorder = Arc::new(RecordingToaster::new());
        let notifier = Notifier::new(recorder.clone());

        let first = notifier.quick_error("Error", Some("Failed to process query"));
        let second = notifier.warning(
            ToastOptions::new("Missing Information")
                .description("Please select a project")
                .action("Choose", "select-project"),
        );

        assert_ne!(first, second);
        let toasts = recorder.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].description.as_deref(), Some("Failed to process query"));
        assert_eq!(toasts[1].action.as_ref().map(|a| a.label.as_str()), Some("Choose"));
    }
}
