use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Maps `-v` counts to a default filter.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "bozor_auth=debug,bozor_cli=debug,warn",
        _ => "bozor_auth=trace,bozor_cli=trace,info",
    }
}

/// Logs go to stderr so command output stays clean.
pub fn init_tracing(verbosity: u8) {
    // Prefer RUST_LOG from env, otherwise use the verbosity level.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level_for(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
