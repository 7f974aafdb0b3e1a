//! Named user actions and the keyboard shortcuts that trigger them.
//!
//! Buttons and keys both produce an [`Action`]; the shell dispatches on the
//! action alone, so rebinding a key never touches the update logic.

use iced::keyboard::{self, key::Named};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Previous,
    Next,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    /// Copy the current image straight into the destination root.
    SaveToRoot,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Quit,
        Action::Previous,
        Action::Next,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ResetZoom,
        Action::SaveToRoot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::Previous => "prev",
            Action::Next => "next",
            Action::ZoomIn => "zoom-in",
            Action::ZoomOut => "zoom-out",
            Action::ResetZoom => "reset-zoom",
            Action::SaveToRoot => "save",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// A letter key, matched without regard to case.
    Char(char),
    Escape,
}

impl Shortcut {
    fn matches(self, key: &keyboard::Key) -> bool {
        match (self, key) {
            (Shortcut::Escape, keyboard::Key::Named(Named::Escape)) => true,
            (Shortcut::Char(c), keyboard::Key::Character(s)) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: Vec<(Shortcut, Action)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (Shortcut::Escape, Action::Quit),
                (Shortcut::Char('a'), Action::Previous),
                (Shortcut::Char('s'), Action::Next),
                (Shortcut::Char('o'), Action::ZoomIn),
                (Shortcut::Char('i'), Action::ZoomOut),
                (Shortcut::Char('r'), Action::ResetZoom),
                (Shortcut::Char('d'), Action::SaveToRoot),
            ],
        }
    }
}

impl KeyBindings {
    /// Drop every shortcut bound to `action`.
    pub fn without(mut self, action: Action) -> Self {
        self.bindings.retain(|(_, a)| *a != action);
        self
    }

    pub fn resolve(&self, key: &keyboard::Key) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(shortcut, _)| shortcut.matches(key))
            .map(|(_, action)| *action)
    }

    /// Human-readable shortcut for `action`, for button tooltips and help.
    pub fn label_for(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, a)| *a == action)
            .map(|(shortcut, _)| match shortcut {
                Shortcut::Char(c) => c.to_ascii_uppercase().to_string(),
                Shortcut::Escape => "Esc".to_string(),
            })
    }
}
