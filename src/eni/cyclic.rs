//! The `Cyclic` ENI view entity (spec §3): the configured bus cycle duration.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cyclic {
    cycle_time: Duration,
}

impl Cyclic {
    pub(crate) fn new(cycle_time: Duration) -> Self {
        Cyclic { cycle_time }
    }

    pub fn cycle_time(&self) -> Duration {
        self.cycle_time
    }
}
