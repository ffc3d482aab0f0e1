//! Keybinding system for the terminal front end
//!
//! Bindings change with what is on screen: the entry prompt, a running tour,
//! or the plain dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Next,
    Previous,
    /// The popup's main button: Next, or Finish on the last step
    Primary,
    Close,
    /// Forwarded to the tour as an `Escape` keydown
    Escape,
    Accept,
    Decline,
    StartTour,
    Restart,
    ScrollUp,
    ScrollDown,
    Quit,
}

/// What the user is currently looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    /// Entry prompt is on screen
    Prompt,
    /// Tour session is running
    Touring,
    /// Plain dashboard
    Idle,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self::with_modifiers(key, KeyModifiers::NONE, action, display, description)
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        // Shifted characters arrive with SHIFT set; compare the code only.
        let modifiers = event.modifiers.difference(KeyModifiers::SHIFT);
        self.key == event.code && self.modifiers == modifiers
    }
}

/// Item shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    context_bindings: HashMap<KeyContext, Vec<Keybinding>>,
    /// Available in every context
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            context_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        self.context_bindings.insert(
            KeyContext::Prompt,
            vec![
                Keybinding::new(KeyCode::Char('y'), KeyAction::Accept, "Y", "Start Tour"),
                Keybinding::new(KeyCode::Enter, KeyAction::Accept, "Enter", "Start Tour"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::Decline, "N", "No, thanks"),
            ],
        );

        self.context_bindings.insert(
            KeyContext::Touring,
            vec![
                Keybinding::new(KeyCode::Right, KeyAction::Next, "Right", "Next"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::Next, "N", "Next"),
                Keybinding::new(KeyCode::Left, KeyAction::Previous, "Left", "Previous"),
                Keybinding::new(KeyCode::Char('p'), KeyAction::Previous, "P", "Previous"),
                Keybinding::new(KeyCode::Enter, KeyAction::Primary, "Enter", "Next/Finish"),
                Keybinding::new(KeyCode::Char('x'), KeyAction::Close, "X", "Close"),
                Keybinding::new(KeyCode::Esc, KeyAction::Escape, "Esc", "Exit tour"),
            ],
        );

        self.context_bindings.insert(
            KeyContext::Idle,
            vec![
                Keybinding::new(KeyCode::Char('t'), KeyAction::StartTour, "T", "Take tour"),
                Keybinding::new(KeyCode::Char('r'), KeyAction::Restart, "R", "Restart tour"),
                Keybinding::new(KeyCode::Up, KeyAction::ScrollUp, "Up", "Scroll up"),
                Keybinding::new(KeyCode::Down, KeyAction::ScrollDown, "Down", "Scroll down"),
            ],
        );
    }

    /// Bindings for a context, context-specific first
    pub fn get_bindings(&self, context: KeyContext) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();
        if let Some(context_bindings) = self.context_bindings.get(&context) {
            bindings.extend(context_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());
        bindings
    }

    /// Map a key event to an action in `context`
    pub fn resolve(&self, context: KeyContext, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(context)
            .into_iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// Status bar items, one per distinct action
    pub fn get_nav_items(&self, context: KeyContext) -> Vec<NavBarItem> {
        let mut items: Vec<NavBarItem> = Vec::new();
        let mut seen: Vec<KeyAction> = Vec::new();
        let mut has_scroll = false;

        for binding in self.get_bindings(context) {
            if seen.contains(&binding.action) {
                continue;
            }
            seen.push(binding.action);

            // Combine Up/Down into a single item
            if matches!(binding.action, KeyAction::ScrollUp | KeyAction::ScrollDown) {
                if !has_scroll {
                    items.push(NavBarItem {
                        key_display: "Up/Dn".to_string(),
                        action_label: "Scroll".to_string(),
                    });
                    has_scroll = true;
                }
                continue;
            }

            items.push(NavBarItem {
                key_display: binding.display.clone(),
                action_label: binding.description.clone(),
            });
        }

        items
    }
}
