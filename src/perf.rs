#[cfg(feature = "perf")]
use std::time::Instant;

#[cfg(feature = "perf")]
pub struct PerfGuard {
    label: &'static str,
    start: Instant,
}

#[cfg(feature = "perf")]
impl Drop for PerfGuard {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        tracing::debug!(target: "perf", label = self.label, micros, "timed scope");
    }
}

/// Times the enclosing scope when built with `--features perf`.
#[cfg(feature = "perf")]
#[inline]
pub fn scope(label: &'static str) -> PerfGuard {
    PerfGuard {
        label,
        start: Instant::now(),
    }
}

#[cfg(not(feature = "perf"))]
pub struct PerfGuard;

#[cfg(not(feature = "perf"))]
#[inline]
pub fn scope(_label: &'static str) -> PerfGuard {
    PerfGuard
}
