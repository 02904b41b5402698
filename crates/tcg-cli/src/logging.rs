//! Subscriber setup
//!
//! Logs go to stderr so stdout carries only rendered output. `RUST_LOG`
//! overrides the level chosen by `--verbose`; `--log-json` switches to one
//! JSON object per event.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub(crate) fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn init(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let text = (!json).then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));
    let structured = json.then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(text)
        .with(structured)
        .with(filter)
        .init();
}
