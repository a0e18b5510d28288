//! Console output for binaries and demos.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a `fmt` subscriber filtered by `MEMOSTASH_LOG`, falling back to `info`.
///
/// Status messages of [`save_result`](crate::persist::save_result) and
/// [`measure_time`](crate::timing::measure_time) are logged at `info`. Calling this more than
/// once, or after another global subscriber is set, is harmless.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("MEMOSTASH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

        // The host program may have installed its own subscriber already; keep that one.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .try_init();
    });
}
