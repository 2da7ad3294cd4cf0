//! Input subsystem.
//!
//! The public state API does not expose winit types; `translate_window_event`
//! is the only place that reads them.

mod state;
mod translate;
mod types;

pub use state::InputState;
pub use translate::{map_key, translate_window_event};
pub use types::{InputEvent, Key, KeyState};
