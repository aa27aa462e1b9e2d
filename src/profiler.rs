use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Scoped profiler recording cumulative time and call count per section.
#[derive(Default)]
pub struct Profiler {
    pub timings: HashMap<&'static str, (Duration, u32)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let entry = self.timings.entry(name).or_default();
        entry.0 += elapsed;
        entry.1 += 1;
    }

    /// Sections ordered by total time, slowest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, Duration, u32)> {
        let mut v: Vec<_> = self.timings.iter().map(|(n, (d, c))| (*n, *d, *c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1));
        v
    }

    pub fn clear(&mut self) {
        self.timings.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (section, total, calls) in self.report_sorted() {
            tracing::info!(section, ?total, calls, "profile");
        }
        self.clear();
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

impl ProfilerGuard {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Start a profiling section. With the `profiling` feature the guard adds
/// its elapsed time to the global profiler when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().record(self.name, self.start.elapsed());
    }
}

/// Profile the enclosing scope when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_sorted_by_total_time() {
        let mut p = Profiler::new();
        p.record("fast", Duration::from_millis(1));
        p.record("slow", Duration::from_millis(5));
        p.record("fast", Duration::from_millis(1));
        let report = p.report_sorted();
        assert_eq!(report[0].0, "slow");
        assert_eq!(report[1], ("fast", Duration::from_millis(2), 2));
        p.clear();
        assert!(p.report_sorted().is_empty());
    }
}
