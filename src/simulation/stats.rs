//! Running counters for the simulation

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    pub rides_requested: usize,
    pub rides_rejected: usize,
    pub rides_matched: usize,
    pub pickups: usize,
    pub rides_completed: usize,
    pub returns_home: usize,
    /// Failed taxi assignments (unreachable pickup)
    pub assignment_failures: usize,
    /// Sum over picked-up passengers of ticks spent waiting
    pub total_wait_ticks: u64,
}

impl SimStats {
    /// Mean ticks between request and pickup
    pub fn average_wait_ticks(&self) -> Option<f32> {
        if self.pickups == 0 {
            None
        } else {
            Some(self.total_wait_ticks as f32 / self.pickups as f32)
        }
    }

    /// Completed rides as a percentage of accepted requests
    pub fn completion_rate(&self) -> f32 {
        let accepted = self.rides_requested.saturating_sub(self.rides_rejected);
        if accepted == 0 {
            0.0
        } else {
            self.rides_completed as f32 / accepted as f32 * 100.0
        }
    }
}
