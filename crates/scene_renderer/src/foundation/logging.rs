//! Logging utilities and structured logging support

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// Honors `RUST_LOG` when set and falls back to `info` otherwise. Safe to call
/// more than once; only the first call installs the logger.
pub fn init() {
    init_with_filter(None);
}

/// Initialize the logging system with an explicit `env_logger` filter string
/// (e.g. `"scene_renderer=debug"`), overriding `RUST_LOG`.
pub fn init_with_filter(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        // Tests may have installed a logger already
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("Logging initialized");
    });
}
