use crate::input::{Key, KeyEvent};

/// Render loop lifecycle.
///
/// `Running -> ClosingRequested -> Terminated`; there is no way back.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LoopState {
    #[default]
    Running,
    /// Exit key or window close seen; one more iteration runs.
    ClosingRequested,
    Terminated,
}

impl LoopState {
    pub fn request_close(&mut self) {
        if *self == Self::Running {
            log::info!("close requested");
            *self = Self::ClosingRequested;
        }
    }

    /// Requests close if `event` is a fresh press of one of `exit_keys`.
    /// Returns whether it did.
    pub fn on_key(&mut self, event: &KeyEvent, exit_keys: &[Key]) -> bool {
        if event.is_press() && exit_keys.contains(&event.key) {
            log::debug!("exit key {:?} pressed", event.key);
            self.request_close();
            true
        } else {
            false
        }
    }

    /// Called at the end of every loop iteration.
    pub fn finish_iteration(&mut self) {
        if *self == Self::ClosingRequested {
            log::debug!("final iteration done; terminating");
            *self = Self::Terminated;
        }
    }

    pub fn is_running(self) -> bool {
        self == Self::Running
    }

    pub fn is_terminated(self) -> bool {
        self == Self::Terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyState;

    const EXIT: [Key; 2] = [Key::Q, Key::Escape];

    fn press(key: Key) -> KeyEvent {
        KeyEvent { key, state: KeyState::Pressed, repeat: false }
    }

    #[test]
    fn exit_key_terminates_within_one_iteration() {
        let mut s = LoopState::default();
        assert!(s.on_key(&press(Key::Q), &EXIT));
        assert_eq!(s, LoopState::ClosingRequested);
        s.finish_iteration();
        assert!(s.is_terminated());
    }

    #[test]
    fn other_keys_keep_running() {
        let mut s = LoopState::default();
        assert!(!s.on_key(&press(Key::W), &EXIT));
        let release = KeyEvent { state: KeyState::Released, ..press(Key::Q) };
        assert!(!s.on_key(&release, &EXIT));
        let repeat = KeyEvent { repeat: true, ..press(Key::Escape) };
        assert!(!s.on_key(&repeat, &EXIT));
        s.finish_iteration();
        assert!(s.is_running());
    }

    #[test]
    fn terminated_is_final() {
        let mut s = LoopState::ClosingRequested;
        s.finish_iteration();
        s.request_close();
        s.finish_iteration();
        assert_eq!(s, LoopState::Terminated);
    }
}
