//! ULS command-line driver.
//!
//! The `uls` binary tokenizes files with a built-in sample token
//! specification, records the tokens as stream files and reads stream
//! files back.

pub mod commands;
mod sample;

use std::sync::Once;

pub use sample::{sample_config, sample_lexer, SAMPLE_SPEC};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber once per process.
///
/// Nothing is installed unless `ULS_LOG` (or `RUST_LOG`) is set; its value
/// is an `EnvFilter` directive such as `uls_stream=debug`. Spans are
/// printed as an indented tree on stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let directives = std::env::var("ULS_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(EnvFilter::new(directives))
                .init();
        }
    });
}
