// src/logging.rs
use env_logger::{Builder, Env};

/// Log level for a count of `-v` flags.
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global logger. `RUST_LOG` takes precedence over `verbosity`.
/// Calling it again is a no-op.
pub fn init(verbosity: u8) {
    let env = Env::default().default_filter_or(level_for(verbosity));
    // Fails only when a logger is already installed.
    let _ = Builder::from_env(env).format_timestamp(None).try_init();
}
