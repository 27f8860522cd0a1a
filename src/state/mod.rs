//! Mutable per-instance state for sequential primitives.
//!
//! Each circuit instance of a primitive exclusively owns one
//! [`PrimitiveState`]. Cloning a state value is a deep copy (including the
//! nested [`ClockState`]); duplicated instances never share mutable state.

pub use random::{LcgState, TinyMtState};
pub use shift::ShiftRegisterState;

mod random;
mod shift;

use crate::bitarr;
use crate::bitarray::{BitArray, BitState};
use crate::clock::ClockState;

/// The state owned by one primitive instance.
///
/// This is a tagged union over all container kinds; the matching
/// [`SequentialFn`] variant knows which container it expects and reconciles
/// it on configuration changes.
///
/// [`SequentialFn`]: crate::func::SequentialFn
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveState {
    /// Single-bit flip-flop storage.
    FlipFlop(FlipFlopState),
    /// Single-word register storage.
    Register(RegisterState),
    /// Multi-stage shift register storage.
    ShiftRegister(ShiftRegisterState),
    /// Counter storage.
    Counter(CounterState),
    /// Linear-congruential generator state.
    Lcg(LcgState),
    /// Xorshift-add generator state.
    TinyMt(TinyMtState),
}

/// State of a single-bit flip-flop: the stored bit and its clock history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipFlopState {
    /// The stored bit.
    pub value: BitState,
    /// Clock transition tracking.
    pub clock: ClockState,
}
impl Default for FlipFlopState {
    fn default() -> Self {
        Self { value: BitState::Low, clock: ClockState::new() }
    }
}
impl FlipFlopState {
    /// Creates a flip-flop state holding a low bit.
    pub fn new() -> Self {
        Default::default()
    }
}

/// State of a word-wide register: the stored word and its clock history.
///
/// The stored value's width is the register's width; any width change
/// immediately truncates or zero-extends the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterState {
    /// The stored word.
    pub value: BitArray,
    /// Clock transition tracking.
    pub clock: ClockState,
}
impl RegisterState {
    /// Creates a register state of `width` zero bits.
    pub fn new(width: u8) -> Self {
        Self { value: bitarr![0; width], clock: ClockState::new() }
    }

    /// The register's width in bits.
    pub fn width(&self) -> u8 {
        self.value.len()
    }

    /// Changes the register's width, truncating or zero-extending the value.
    pub fn set_width(&mut self, width: u8) {
        self.value = self.value.resized(width, false);
    }
}

/// State of a counter: the current count and its clock history.
///
/// The count is stored as a vector so an undefined count (`X`/`E`) can
/// propagate through the output path as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    /// The current count.
    pub value: BitArray,
    /// Clock transition tracking.
    pub clock: ClockState,
}
impl CounterState {
    /// Creates a counter state of `width` zero bits.
    pub fn new(width: u8) -> Self {
        Self { value: bitarr![0; width], clock: ClockState::new() }
    }

    /// The counter's width in bits.
    pub fn width(&self) -> u8 {
        self.value.len()
    }

    /// Changes the counter's width, truncating or zero-extending the count.
    pub fn set_width(&mut self, width: u8) {
        self.value = self.value.resized(width, false);
    }
}

#[cfg(test)]
mod test {
    use super::{PrimitiveState, RegisterState, ShiftRegisterState};
    use crate::bitarr;
    use crate::bitarray::BitState;
    use crate::clock::Trigger;

    #[test]
    fn clone_is_deep() {
        let mut original = PrimitiveState::Register(RegisterState::new(8));
        let copy = original.clone();

        let PrimitiveState::Register(reg) = &mut original else { unreachable!() };
        reg.value = bitarr![1; 8];
        reg.clock.classify(BitState::High, Trigger::RisingEdge);

        // The copy must be unaffected by mutations of the original.
        let PrimitiveState::Register(copied) = &copy else { unreachable!() };
        assert_eq!(copied.value, bitarr![0; 8]);
        assert_eq!(copied.clock.last_clock(), BitState::Low);
    }

    #[test]
    fn shift_clone_is_deep() {
        let mut original = ShiftRegisterState::new(4, 3);
        original.push(bitarr![1; 4]);
        let copy = original.clone();

        original.push(bitarr![1, 0, 1, 0]);
        assert_eq!(copy.get(0), bitarr![1; 4]);
        assert_eq!(copy.get(1), bitarr![0; 4]);
    }

    #[test]
    fn register_width_change_reconciles_value() {
        let mut reg = RegisterState::new(8);
        reg.value = bitarr![1; 8];
        reg.set_width(4);
        assert_eq!(reg.value, bitarr![1; 4]);
        reg.set_width(6);
        assert_eq!(reg.value, bitarr![1, 1, 1, 1, 0, 0]);
    }
}
