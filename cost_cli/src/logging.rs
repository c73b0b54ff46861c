//! Tracing subscriber setup.
//!
//! `RUST_LOG` selects the filter (default `warn`, so report output stays
//! clean). Logs go to stderr; reports and JSON go to stdout.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default = if verbose { "cost_core=debug,printcost=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
