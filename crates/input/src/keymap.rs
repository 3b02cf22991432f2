use crate::Action;
use std::collections::HashMap;

/// A raw key identifier as delivered by the platform.
///
/// Text ids cover named keys (`"ArrowUp"`) and printable characters
/// (`"w"`, `"ㅈ"`); codes are the legacy numeric key codes (`38` for the up
/// arrow). Single ASCII letters are stored lowercase so `"W"` and `"w"` are
/// the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyId {
    Text(String),
    Code(u32),
}

impl KeyId {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Self::Text(c.to_ascii_lowercase().into()),
            _ => Self::Text(s),
        }
    }

    pub fn code(code: u32) -> Self {
        Self::Code(code)
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyId::Text(s) => write!(f, "{s:?}"),
            KeyId::Code(c) => write!(f, "#{c}"),
        }
    }
}

/// Text and legacy-code aliases for each action. The Hangul entries are the
/// characters the same physical keys produce on a Korean 2-set layout.
const DEFAULT_BINDINGS: &[(Action, &[&str], &[u32])] = &[
    (Action::Forward, &["ArrowUp", "w", "ㅈ"], &[38, 87]),
    (Action::Backward, &["ArrowDown", "s", "ㄴ"], &[40, 83]),
    (Action::StrafeLeft, &["ArrowLeft", "a", "ㅁ"], &[37, 65]),
    (Action::StrafeRight, &["ArrowRight", "d", "ㅇ"], &[39, 68]),
    (Action::Ascend, &["r", "ㄱ"], &[82]),
    (Action::Descend, &["v", "ㅍ"], &[86]),
];

/// Maps key identifiers to actions.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<KeyId, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for (action, texts, codes) in DEFAULT_BINDINGS {
            for text in *texts {
                map.bind(KeyId::text(*text), *action);
            }
            for code in *codes {
                map.bind(KeyId::code(*code), *action);
            }
        }
        map
    }
}

impl KeyMap {
    /// A map with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: KeyId, action: Action) -> Option<Action> {
        self.bindings.insert(key, action)
    }

    pub fn resolve(&self, key: &KeyId) -> Option<Action> {
        self.bindings.get(key).copied()
    }

    /// The first text alias `action` has in the default layout.
    pub fn default_key(action: Action) -> KeyId {
        DEFAULT_BINDINGS
            .iter()
            .find(|(a, _, _)| *a == action)
            .and_then(|(_, texts, _)| texts.first())
            .map_or(KeyId::Text(action.to_string()), |t| KeyId::text(*t))
    }

    /// All keys bound to `action`, sorted for stable display.
    pub fn keys_for(&self, action: Action) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.to_string())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
