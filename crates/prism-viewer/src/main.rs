//! Interactive viewer for the prism reference scene.
//!
//! E/Q move the camera, A/D and S/W turn it, Escape quits.

mod controls;
mod geometry;
mod viewer;

use prism_engine::device::GpuInit;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::window::{Runtime, RuntimeConfig};

use crate::viewer::Viewer;

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "prism".to_string(),
        ..Default::default()
    };

    if let Err(e) = Runtime::run(config, GpuInit::default(), Viewer::new) {
        log::error!("prism viewer failed: {e:#}");
        std::process::exit(1);
    }
}
