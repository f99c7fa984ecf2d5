use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Current keyboard state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Keys currently held down.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events are not delivered while unfocused.
                    self.keys_down.clear();
                }
            }
            InputEvent::Key(k) => match k.state {
                KeyState::Pressed => {
                    self.keys_down.insert(k.key);
                }
                KeyState::Released => {
                    self.keys_down.remove(&k.key);
                }
            },
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key(KeyEvent { key, state, repeat: false })
    }

    #[test]
    fn press_and_release_tracked() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::Q, KeyState::Pressed));
        assert!(s.is_down(Key::Q));
        s.apply_event(&key(Key::Q, KeyState::Released));
        assert!(!s.is_down(Key::Q));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::Focused(true));
        s.apply_event(&key(Key::W, KeyState::Pressed));
        s.apply_event(&InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(!s.focused);
    }
}
