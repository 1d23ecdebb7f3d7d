//! Simulation tunables

/// Default taxi speed in layout units per tick
pub const DEFAULT_TAXI_SPEED: f32 = 5.0;

/// Ticks a taxi stands still after a pickup or a drop-off
pub const DEFAULT_SETTLE_TICKS: u32 = 1;

/// How many waiting passengers the dispatcher may match in a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// Stop after the first successful match
    #[default]
    OnePerTick,
    /// Try every waiting passenger
    AllEligible,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub taxi_speed: f32,
    pub settle_ticks: u32,
    pub dispatch_policy: DispatchPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            taxi_speed: DEFAULT_TAXI_SPEED,
            settle_ticks: DEFAULT_SETTLE_TICKS,
            dispatch_policy: DispatchPolicy::OnePerTick,
        }
    }
}
