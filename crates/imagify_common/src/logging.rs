//! Logging setup for the Imagify backend.
//!
//! All crates log through `tracing`; the binary calls [`init_with_filter`]
//! once at startup with the level from `logging.level`.

use tracing::info;
use tracing_subscriber::{
    filter::{Directive, LevelFilter, ParseError},
    fmt,
    prelude::*,
    EnvFilter,
};

/// Target prefix shared by every Imagify crate.
const TARGET: &str = "imagify";

/// Directive enabling `level` for the Imagify targets. Unknown levels map to
/// INFO for those targets only.
fn imagify_directive(level: &str) -> Result<Directive, ParseError> {
    let level = level.trim().parse().unwrap_or(LevelFilter::INFO);
    format!("{}={}", TARGET, level).parse()
}

/// Installs the global subscriber: `RUST_LOG` plus `imagify=<level>`, printed
/// with target, source location and thread.
///
/// A second call keeps the subscriber that is already installed.
pub fn init_with_filter(level: &str) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = imagify_directive(level) {
        filter = filter.add_directive(directive);
    }

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Logging initialized ({}={})", TARGET, level);
    }
}
