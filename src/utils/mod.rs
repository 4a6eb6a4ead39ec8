pub mod build_info;

use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the fmt subscriber on stderr, honouring `RUST_LOG` and defaulting
/// this crate to `info`.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "fintrack=info".parse() {
        filter = filter.add_directive(directive);
    }
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
