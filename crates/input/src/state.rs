use crate::{Action, KeyId, KeyMap};

/// The last pressed key and whether a key is currently held.
///
/// Written by key-down/key-up handlers, read once per tick. There is no
/// queue: a new key-down replaces the previous key, and any key-up clears
/// the held flag while leaving the stale key recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    last_key: Option<KeyId>,
    held: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: KeyId) {
        tracing::trace!(%key, "key down");
        self.last_key = Some(key);
        self.held = true;
    }

    pub fn key_up(&mut self) {
        tracing::trace!("key up");
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn last_key(&self) -> Option<&KeyId> {
        self.last_key.as_ref()
    }

    /// The action to apply this tick, if a mapped key is held.
    pub fn current_action(&self, keymap: &KeyMap) -> Option<Action> {
        if !self.held {
            return None;
        }
        self.last_key.as_ref().and_then(|k| keymap.resolve(k))
    }
}
