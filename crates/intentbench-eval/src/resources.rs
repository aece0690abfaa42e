//! System resource sampling.

use sysinfo::System;

use intentbench_core::{ResourceSample, ResourceSampler};

/// Samples global CPU and memory usage through sysinfo.
///
/// CPU usage is computed between consecutive refreshes, so the first sample
/// after construction reads as zero.
pub struct SystemSampler {
    sys: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self { sys }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSampler for SystemSampler {
    fn sample(&mut self) -> ResourceSample {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            (self.sys.used_memory() as f64 / total as f64 * 100.0) as f32
        };

        ResourceSample {
            cpu_percent: self.sys.global_cpu_usage(),
            memory_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_percentages() {
        let mut sampler = SystemSampler::new();
        let sample = sampler.sample();
        assert!((0.0..=100.0).contains(&sample.memory_percent));
        assert!(sample.cpu_percent >= 0.0);
    }
}
