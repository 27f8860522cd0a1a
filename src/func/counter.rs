//! The up/down counter primitive.

use serde::{Deserialize, Serialize};

use crate::bitarr;
use crate::bitarray::{BitArray, BitState};
use crate::clock::Trigger;
use crate::func::{enabled, resolve, Resolution, Sequential, TickInputs};
use crate::state::{CounterState, PrimitiveState};

/// What a counter does on the tick after reaching its goal value.
///
/// Counting up the goal is `max`; counting down it is `0`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalBehavior {
    /// Wrap to the opposite end of the range.
    #[default]
    Wrap,
    /// Hold the goal value.
    Stay,
    /// Keep counting past the goal, wrapping only at the width ceiling.
    Continue,
    /// Load the value on the data input.
    LoadNext,
}

/// An up/down counter primitive.
///
/// Data input layout: `[load_value, load, direction]` where `load` is one
/// bit (load beats counting) and `direction` is one bit (counts down only
/// when definitely low). The `enable` line is the count enable; `reset`
/// clears to zero.
///
/// Outputs: `[value, carry]`. `carry` is high while the value sits at the
/// goal for the current direction, unknown if the value is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counter {
    bitsize: u8,
    max: u64,
    /// Behavior on the tick after the goal value is reached.
    pub on_goal: GoalBehavior,
    /// When the counter samples its inputs.
    pub trigger: Trigger,
}
impl Counter {
    /// Creates a counter of the specified bitsize counting over its full
    /// range, rising-edge triggered.
    pub fn new(bitsize: u8) -> Self {
        let bitsize = bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
        Self {
            bitsize,
            max: Self::mask(bitsize),
            on_goal: GoalBehavior::default(),
            trigger: Trigger::default(),
        }
    }

    const fn mask(bitsize: u8) -> u64 {
        match bitsize {
            64.. => u64::MAX,
            b => (1 << b) - 1,
        }
    }

    /// The counter's width in bits.
    pub fn bitsize(&self) -> u8 {
        self.bitsize
    }
    /// The largest value counted to when counting up.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Changes the maximum value, truncated to the counter's width.
    pub fn set_max(&mut self, max: u64) {
        self.max = max & Self::mask(self.bitsize);
    }

    /// Changes the counter's width, reconciling the maximum.
    ///
    /// Shrinking truncates the maximum to the new width. Growing keeps it,
    /// unless it sat at the old width's ceiling, in which case it rises to
    /// the new ceiling.
    pub fn set_bitsize(&mut self, bitsize: u8) {
        let bitsize = bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
        let old_mask = Self::mask(self.bitsize);
        let new_mask = Self::mask(bitsize);
        self.max = match () {
            _ if bitsize < self.bitsize => self.max & new_mask,
            _ if self.max == old_mask => new_mask,
            _ => self.max,
        };
        self.bitsize = bitsize;
    }

    /// Brings a loaded value into the counting range: values above the
    /// maximum are masked against it.
    const fn clamp_loaded(&self, value: u64) -> u64 {
        if value > self.max {
            value & self.max
        } else {
            value
        }
    }

    /// Computes the value after a counting step from `cur`.
    fn count(&self, cur: u64, up: bool, load_value: u64) -> u64 {
        let mask = Self::mask(self.bitsize);
        let goal = if up { self.max } else { 0 };
        if cur == goal {
            match self.on_goal {
                GoalBehavior::Wrap => if up { 0 } else { self.max },
                GoalBehavior::Stay => cur,
                GoalBehavior::Continue => {
                    (if up { cur.wrapping_add(1) } else { cur.wrapping_sub(1) }) & mask
                }
                GoalBehavior::LoadNext => self.clamp_loaded(load_value & mask),
            }
        } else {
            (if up { cur.wrapping_add(1) } else { cur.wrapping_sub(1) }) & mask
        }
    }
}
impl Sequential for Counter {
    fn initial_state(&self) -> PrimitiveState {
        PrimitiveState::Counter(CounterState::new(self.bitsize))
    }

    fn reconcile(&self, state: &mut PrimitiveState) {
        match state {
            PrimitiveState::Counter(st) => st.set_width(self.bitsize),
            st => *st = self.initial_state(),
        }
    }

    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray> {
        self.reconcile(state);
        let PrimitiveState::Counter(st) = state else { unreachable!() };

        let load_value = inputs.data.first().copied().unwrap_or(bitarr![0; self.bitsize]);
        let load = inputs.data.get(1).map(|b| b.index(0)) == Some(BitState::High);
        let up = inputs.data.get(2).map(|b| b.index(0)) != Some(BitState::Low);

        let fires = st.clock.classify(inputs.clock, self.trigger);
        let resolution = resolve(inputs.reset, BitState::Low, fires);
        match resolution {
            Resolution::Clear => st.value = bitarr![0; self.bitsize],
            Resolution::Preset | Resolution::Hold => {}
            Resolution::Update if load => {
                let loaded = load_value.resized(self.bitsize, false);
                st.value = match u64::try_from(loaded) {
                    Ok(v) => BitArray::from_bits(self.clamp_loaded(v), self.bitsize),
                    Err(_) => loaded,
                };
            }
            Resolution::Update => {
                if enabled(inputs.enable) {
                    st.value = match (u64::try_from(st.value), u64::try_from(load_value)) {
                        (Ok(cur), loaded) => BitArray::from_bits(
                            self.count(cur, up, loaded.unwrap_or(0)),
                            self.bitsize,
                        ),
                        (Err(_), _) => {
                            log::error!("counter value is undefined, producing an error output");
                            BitArray::error(self.bitsize)
                        }
                    };
                }
            }
        }

        // The carry is forced low while the clear line holds the counter.
        let goal = if up { self.max } else { 0 };
        let carry = if resolution == Resolution::Clear {
            BitState::Low
        } else {
            match u64::try_from(st.value) {
                Ok(val) => BitState::from(val == goal),
                Err(_) => BitState::Unk,
            }
        };
        vec![st.value, BitArray::repeat(carry, 1)]
    }
}
