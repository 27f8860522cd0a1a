//! Word-wide registers and multi-stage shift registers.

use serde::{Deserialize, Serialize};

use crate::bitarr;
use crate::bitarray::{BitArray, BitState};
use crate::clock::Trigger;
use crate::func::{enabled, resolve, Resolution, Sequential, TickInputs};
use crate::state::{PrimitiveState, RegisterState, ShiftRegisterState};

/// A register primitive storing one word.
///
/// Data input layout: `[d]` (`bitsize` bits). Outputs: `[q]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    bitsize: u8,
    /// When the register samples its input.
    pub trigger: Trigger,
}
impl Register {
    /// Creates a register of the specified bitsize, rising-edge triggered.
    pub fn new(bitsize: u8) -> Self {
        Self {
            bitsize: bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE),
            trigger: Trigger::default(),
        }
    }

    /// The register's width in bits.
    pub fn bitsize(&self) -> u8 {
        self.bitsize
    }

    /// Changes the register's width.
    pub fn set_bitsize(&mut self, bitsize: u8) {
        self.bitsize = bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
    }
}
impl Sequential for Register {
    fn initial_state(&self) -> PrimitiveState {
        PrimitiveState::Register(RegisterState::new(self.bitsize))
    }

    fn reconcile(&self, state: &mut PrimitiveState) {
        match state {
            PrimitiveState::Register(st) => st.set_width(self.bitsize),
            st => *st = self.initial_state(),
        }
    }

    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray> {
        self.reconcile(state);
        let PrimitiveState::Register(st) = state else { unreachable!() };

        let fires = st.clock.classify(inputs.clock, self.trigger);
        match resolve(inputs.reset, inputs.preset, fires) {
            Resolution::Clear => st.value = bitarr![0; self.bitsize],
            Resolution::Preset => st.value = bitarr![1; self.bitsize],
            Resolution::Hold => {}
            Resolution::Update => {
                if enabled(inputs.enable) {
                    let din = inputs.data.first().copied().unwrap_or(bitarr![X; self.bitsize]);
                    st.value = din.resized(self.bitsize, false);
                }
            }
        }
        vec![st.value]
    }
}

/// A shift register primitive.
///
/// Data input layout: `[serial_in]`, or with parallel load enabled
/// `[serial_in, load, p_0, ..., p_{L-1}]` where `load` is one bit and `p_i`
/// loads stage `i` (stage `0` is where serial data enters). The `enable`
/// line is the shift enable.
///
/// Outputs: `[q]` (the oldest stage, i.e. the end of the chain), followed by
/// every stage newest-first when parallel load is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftRegister {
    bitsize: u8,
    length: u8,
    /// Whether the parallel load/read ports exist.
    pub parallel: bool,
    /// When the register shifts.
    pub trigger: Trigger,
}
impl ShiftRegister {
    /// The largest supported stage count.
    pub const MAX_LENGTH: u8 = 32;

    /// Creates a serial-only shift register, rising-edge triggered.
    pub fn new(bitsize: u8, length: u8) -> Self {
        Self {
            bitsize: bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE),
            length: length.clamp(1, Self::MAX_LENGTH),
            parallel: false,
            trigger: Trigger::default(),
        }
    }

    /// The width of each stage in bits.
    pub fn bitsize(&self) -> u8 {
        self.bitsize
    }
    /// The number of stages.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Changes the stage width.
    pub fn set_bitsize(&mut self, bitsize: u8) {
        self.bitsize = bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
    }
    /// Changes the stage count.
    pub fn set_length(&mut self, length: u8) {
        self.length = length.clamp(1, Self::MAX_LENGTH);
    }
}
impl Sequential for ShiftRegister {
    fn initial_state(&self) -> PrimitiveState {
        PrimitiveState::ShiftRegister(ShiftRegisterState::new(
            self.bitsize,
            usize::from(self.length),
        ))
    }

    fn reconcile(&self, state: &mut PrimitiveState) {
        match state {
            PrimitiveState::ShiftRegister(st) => {
                st.set_width(self.bitsize);
                st.set_length(usize::from(self.length));
            }
            st => *st = self.initial_state(),
        }
    }

    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray> {
        self.reconcile(state);
        let PrimitiveState::ShiftRegister(st) = state else { unreachable!() };

        let fires = st.clock.classify(inputs.clock, self.trigger);
        match resolve(inputs.reset, BitState::Low, fires) {
            Resolution::Clear => st.clear(),
            Resolution::Preset | Resolution::Hold => {}
            Resolution::Update => {
                let load = self.parallel
                    && inputs.data.get(1).map(|b| b.index(0)) == Some(BitState::High);
                if load {
                    // Stage i takes parallel input i; stage 0 is the newest.
                    let length = usize::from(self.length);
                    for i in (0..length).rev() {
                        let val = inputs.data.get(2 + i).copied()
                            .unwrap_or(bitarr![X; self.bitsize]);
                        st.push(val);
                    }
                } else if enabled(inputs.enable) {
                    let din = inputs.data.first().copied().unwrap_or(bitarr![X; self.bitsize]);
                    st.push(din);
                }
            }
        }

        let length = usize::from(self.length);
        let mut out = vec![st.get(length - 1)];
        if self.parallel {
            out.extend((0..length).map(|i| st.get(i)));
        }
        out
    }
}
