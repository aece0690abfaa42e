//! Deterministic resource sampler.

use std::collections::VecDeque;

use intentbench_core::{ResourceSample, ResourceSampler};

/// Returns queued samples in order, then repeats the last one.
#[derive(Debug, Clone, Default)]
pub struct FixedSampler {
    queue: VecDeque<ResourceSample>,
    last: ResourceSample,
}

impl FixedSampler {
    /// Always report `cpu` / `memory`.
    pub fn constant(cpu_percent: f32, memory_percent: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            last: ResourceSample {
                cpu_percent,
                memory_percent,
            },
        }
    }

    /// Report `(cpu, memory)` pairs in order.
    pub fn sequence(samples: &[(f32, f32)]) -> Self {
        Self {
            queue: samples
                .iter()
                .map(|&(cpu_percent, memory_percent)| ResourceSample {
                    cpu_percent,
                    memory_percent,
                })
                .collect(),
            last: ResourceSample::default(),
        }
    }
}

impl ResourceSampler for FixedSampler {
    fn sample(&mut self) -> ResourceSample {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}
