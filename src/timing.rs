use std::time::{Duration, Instant};

/// A value together with how long it took to compute.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

pub fn timed<T, F: FnOnce() -> T>(f: F) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    Timed {
        value,
        elapsed: start.elapsed(),
    }
}

/// Run `f`, log its wall-clock time under `name` and return its result.
pub fn measure_time<T, F: FnOnce() -> T>(name: &str, f: F) -> T {
    let Timed { value, elapsed } = timed(f);
    tracing::info!(
        "Function {} took {:.6} seconds to execute.",
        name,
        elapsed.as_secs_f64()
    );
    value
}
