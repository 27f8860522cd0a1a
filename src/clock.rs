//! Clock trigger policies and the edge/level classifier.
//!
//! Every clocked primitive owns a [`ClockState`] remembering the clock value
//! it last saw. One call to [`ClockState::classify`] per simulation tick
//! decides whether the primitive's update fires under its [`Trigger`] policy.

use serde::{Deserialize, Serialize};

use crate::bitarray::BitState;

/// The clock transition (or level) that causes a primitive to update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Update on a low-to-high clock transition.
    #[default]
    RisingEdge,
    /// Update on a high-to-low clock transition.
    FallingEdge,
    /// Update whenever the clock is high.
    HighLevel,
    /// Update whenever the clock is low.
    LowLevel,
}
impl Trigger {
    /// All trigger policies, in declaration order.
    pub const ALL: [Trigger; 4] =
        [Trigger::RisingEdge, Trigger::FallingEdge, Trigger::HighLevel, Trigger::LowLevel];

    /// Whether this policy reacts to an edge rather than a level.
    ///
    /// Level-sensitive policies synthesize to a transparent latch instead of
    /// a flip-flop.
    pub fn is_edge(self) -> bool {
        matches!(self, Trigger::RisingEdge | Trigger::FallingEdge)
    }

    /// The clock-inversion code emitted as an HDL parameter.
    ///
    /// `0` means the active edge/level is the rising/high one, `1` the
    /// falling/low one. All generators share this single mapping.
    pub fn clock_polarity(self) -> u64 {
        match self {
            Trigger::RisingEdge | Trigger::HighLevel => 0,
            Trigger::FallingEdge | Trigger::LowLevel => 1,
        }
    }
}

/// Tracks the previously seen clock value for one primitive instance.
///
/// Cloning a [`ClockState`] yields an independent copy; duplicated instances
/// never share clock history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    last_clock: BitState,
}
impl Default for ClockState {
    fn default() -> Self {
        Self { last_clock: BitState::Low }
    }
}
impl ClockState {
    /// Creates a classifier whose remembered clock value is low.
    pub fn new() -> Self {
        Default::default()
    }

    /// The clock value passed to the most recent [`classify`] call.
    ///
    /// [`classify`]: ClockState::classify
    pub fn last_clock(&self) -> BitState {
        self.last_clock
    }

    /// Classifies a clock transition against `trigger`, returning whether the
    /// tick fires.
    ///
    /// The new clock value is always recorded as the previous value for the
    /// next call, even when the result is `false` or the value is `X`/`E`.
    /// Unknown and error values never satisfy an edge or level condition.
    pub fn classify(&mut self, new_clock: BitState, trigger: Trigger) -> bool {
        let old_clock = std::mem::replace(&mut self.last_clock, new_clock);
        match trigger {
            Trigger::RisingEdge => old_clock == BitState::Low && new_clock == BitState::High,
            Trigger::FallingEdge => old_clock == BitState::High && new_clock == BitState::Low,
            Trigger::HighLevel => new_clock == BitState::High,
            Trigger::LowLevel => new_clock == BitState::Low,
        }
    }
}
