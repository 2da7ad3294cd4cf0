use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Which keys are currently held, for one window.
///
/// Keys never seen are up. Losing focus releases every key, since the
/// matching release events go to another window.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    keys_down: HashSet<Key>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        log::trace!("key down: {key}");
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.keys_down.clear();
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn key_up(&self, key: Key) -> bool {
        !self.key_down(key)
    }

    /// Iterates held keys in no particular order.
    pub fn keys_down(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys_down.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn unseen_keys_are_up() {
        let input = InputState::default();
        assert!(input.key_up(Key::W));
        assert!(!input.key_down(Key::Unknown(42)));
    }

    #[test]
    fn press_and_release_toggle_the_key() {
        let mut input = InputState::default();

        input.apply_event(&key(Key::E, KeyState::Pressed));
        assert!(input.key_down(Key::E));
        assert!(input.key_up(Key::Q));

        input.apply_event(&key(Key::E, KeyState::Released));
        assert!(input.key_up(Key::E));
    }

    #[test]
    fn repeats_keep_the_key_held() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::A, KeyState::Pressed));
        input.apply_event(&InputEvent::Key {
            key: Key::A,
            state: KeyState::Pressed,
            repeat: true,
        });

        assert_eq!(input.keys_down().collect::<Vec<_>>(), vec![Key::A]);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = InputState::default();
        input.apply_event(&InputEvent::Focused(true));
        input.apply_event(&key(Key::S, KeyState::Pressed));
        input.apply_event(&key(Key::D, KeyState::Pressed));

        input.apply_event(&InputEvent::Focused(false));

        assert!(!input.focused);
        assert!(input.key_up(Key::S) && input.key_up(Key::D));
    }
}
