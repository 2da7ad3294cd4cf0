//! Concrete shader programs.

mod cook_torrance;

pub use cook_torrance::{CookTorrance, CookTorrancePipeline, CookTorranceSlot};
