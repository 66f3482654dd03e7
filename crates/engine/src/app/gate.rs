use std::collections::BTreeSet;

use tracing::{debug, warn};

/// Why the gate is currently closed. Every process that closes the gate does
/// so with its own hold and its terminal step releases exactly that hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GateHold {
    Boot,
    Navigation,
    Drop,
    Pickup,
    Shuffle,
    Cutscene,
    External,
}

/// Process-wide input gate: pointer actions are honored only while it is open.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    holds: BTreeSet<GateHold>,
}

impl InputGate {
    pub fn is_open(&self) -> bool {
        self.holds.is_empty()
    }

    pub fn is_held_by(&self, hold: GateHold) -> bool {
        self.holds.contains(&hold)
    }

    pub fn holds(&self) -> impl Iterator<Item = GateHold> + '_ {
        self.holds.iter().copied()
    }

    pub fn close(&mut self, hold: GateHold) {
        if !self.holds.insert(hold) {
            warn!(?hold, "input_gate_already_held");
            return;
        }
        debug!(?hold, outstanding = self.holds.len(), "input_gate_closed");
    }

    pub fn release(&mut self, hold: GateHold) {
        if !self.holds.remove(&hold) {
            debug!(?hold, "input_gate_release_without_hold");
            return;
        }
        debug!(?hold, open = self.holds.is_empty(), "input_gate_released");
    }
}
