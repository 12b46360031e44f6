//! Shutter actuator.

use parking_lot::Mutex;
use serde::Serialize;

/// A motorised shutter.
///
/// Amounts are in actuator units; the controller passes them through
/// unchanged and never checks the shutter's position.
pub trait Shutter: Sync {
    /// Lower the shutter by `amount`.
    fn roll_down(&self, amount: f64);

    /// Raise the shutter by `amount`.
    fn roll_up(&self, amount: f64);
}

/// Movement log kept by [`SimulatedShutter`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ShutterState {
    /// How far the shutter is lowered; 0.0 is fully up.
    pub lowered: f64,
    /// Number of `roll_down` calls.
    pub roll_downs: u64,
    /// Number of `roll_up` calls.
    pub roll_ups: u64,
}

/// Shutter stand-in that only records its movements.
///
/// Position is not clamped, so it reflects exactly what was commanded.
#[derive(Debug, Default)]
pub struct SimulatedShutter {
    state: Mutex<ShutterState>,
}

impl SimulatedShutter {
    /// Create a fully raised shutter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(ShutterState {
                lowered: 0.0,
                roll_downs: 0,
                roll_ups: 0,
            }),
        }
    }

    /// Current position and movement counts.
    #[must_use]
    pub fn state(&self) -> ShutterState {
        *self.state.lock()
    }
}

impl Shutter for SimulatedShutter {
    fn roll_down(&self, amount: f64) {
        let mut state = self.state.lock();
        state.lowered += amount;
        state.roll_downs = state.roll_downs.saturating_add(1);
    }

    fn roll_up(&self, amount: f64) {
        let mut state = self.state.lock();
        state.lowered -= amount;
        state.roll_ups = state.roll_ups.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movements_are_recorded() {
        let shutter = SimulatedShutter::new();
        shutter.roll_down(2.0);
        shutter.roll_up(0.5);

        let state = shutter.state();
        assert!((state.lowered - 1.5).abs() < f64::EPSILON);
        assert_eq!(state.roll_downs, 1);
        assert_eq!(state.roll_ups, 1);
    }
}
