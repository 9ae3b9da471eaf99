//! Keyboard shortcut matching and the help-screen grouping of shortcuts.

use std::collections::BTreeMap;

/// Where a key press landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyTarget {
    #[default]
    Document,
    /// A text input, text area or editable region
    Editable,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub target: KeyTarget,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_editable(mut self) -> Self {
        self.target = KeyTarget::Editable;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Other,
}

/// A key combination. `primary` is Ctrl, or Cmd on macOS; either satisfies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: String,
    pub primary: bool,
    pub alt: bool,
    pub shift: bool,
    pub description: String,
    pub prevent_default: bool,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            primary: false,
            alt: false,
            shift: false,
            description: description.into(),
            prevent_default: true,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn allow_default(mut self) -> Self {
        self.prevent_default = false;
        self
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let primary_held = event.ctrl || event.meta;
        self.key.eq_ignore_ascii_case(&event.key)
            && self.primary == primary_held
            && self.alt == event.alt
            && self.shift == event.shift
    }

    /// Key caps for display, modifiers first
    pub fn display_keys(&self, platform: Platform) -> Vec<String> {
        let mac = platform == Platform::Mac;
        let mut keys = Vec::new();
        if self.primary {
            keys.push(if mac { "⌘" } else { "Ctrl" }.to_string());
        }
        if self.alt {
            keys.push(if mac { "⌥" } else { "Alt" }.to_string());
        }
        if self.shift {
            keys.push("⇧".to_string());
        }
        keys.push(self.key.to_uppercase());
        keys
    }

    pub fn category(&self) -> ShortcutCategory {
        let description = self.description.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| description.contains(w));

        if mentions(&["search", "find"]) {
            ShortcutCategory::Search
        } else if mentions(&["theme", "chatbot"]) {
            ShortcutCategory::Interface
        } else if mentions(&["save", "copy"]) {
            ShortcutCategory::Editing
        } else {
            ShortcutCategory::Navigation
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShortcutCategory {
    Navigation,
    Search,
    Editing,
    Interface,
}

impl ShortcutCategory {
    pub fn title(&self) -> &'static str {
        match self {
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Search => "Search",
            ShortcutCategory::Editing => "Editing",
            ShortcutCategory::Interface => "Interface",
        }
    }
}

/// Groups shortcuts for the help screen, keeping their order within each group
pub fn group_by_category(shortcuts: &[Shortcut]) -> BTreeMap<ShortcutCategory, Vec<&Shortcut>> {
    let mut groups: BTreeMap<ShortcutCategory, Vec<&Shortcut>> = BTreeMap::new();
    for shortcut in shortcuts {
        groups.entry(shortcut.category()).or_default().push(shortcut);
    }
    groups
}

/// What a handled key press resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch<A> {
    pub action: A,
    pub prevent_default: bool,
}

/// Ordered shortcut table; the first matching entry wins
#[derive(Debug, Clone)]
pub struct ShortcutRegistry<A> {
    bindings: Vec<(Shortcut, A)>,
}

impl<A> Default for ShortcutRegistry<A> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<A: Clone> ShortcutRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, shortcut: Shortcut, action: A) -> &mut Self {
        self.bindings.push((shortcut, action));
        self
    }

    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.bindings.iter().map(|(s, _)| s.clone()).collect()
    }

    /// Key presses inside editable fields are never treated as shortcuts
    pub fn handle(&self, event: &KeyEvent) -> Option<Dispatch<A>> {
        if event.target == KeyTarget::Editable {
            return None;
        }

        self.bindings
            .iter()
            .find(|(shortcut, _)| shortcut.matches(event))
            .map(|(shortcut, action)| Dispatch {
                action: action.clone(),
                prevent_default: shortcut.prevent_default,
            })
    }
}

/// Shortcuts shared across the application's screens
pub fn common_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("Escape", "Close modal/dialog"),
        Shortcut::new("Enter", "Confirm action"),
        Shortcut::new("s", "Save").primary(),
        Shortcut::new("c", "Copy").primary(),
        Shortcut::new("v", "Paste").primary(),
        Shortcut::new("z", "Undo").primary(),
        Shortcut::new("y", "Redo").primary(),
        Shortcut::new("f", "Find").primary(),
        Shortcut::new("n", "New").primary(),
        Shortcut::new("k", "Global search").primary(),
        Shortcut::new("?", "Show help").shift(),
        Shortcut::new("d", "Toggle theme").primary(),
        Shortcut::new("j", "Open chatbot").primary(),
    ]
}
