//! Pseudo-random number generator primitives.
//!
//! [`Random`] wraps the 48-bit linear-congruential engine, [`TinyMtRng`] the
//! 128-bit xorshift-add engine. Both advance once per firing tick while
//! enabled, and reset on the rising edge of the reset line only.

use serde::{Deserialize, Serialize};

use crate::bitarray::{BitArray, BitState};
use crate::clock::Trigger;
use crate::func::{enabled, Sequential, TickInputs};
use crate::state::{LcgState, PrimitiveState, TinyMtState};

/// A pseudo-random generator primitive backed by the 48-bit LCG.
///
/// No data inputs. Outputs: `[value]` (`bitsize` bits of the current draw).
/// The engine draws 32 bits per step, so the width is capped at 32. A
/// configured seed of `0` means "derive from the wall clock once".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Random {
    bitsize: u8,
    /// The configured seed (`0` derives one at instantiation).
    pub seed: u32,
    /// When the generator advances.
    pub trigger: Trigger,
}
impl Random {
    /// The largest output width: one draw is 32 bits of the seed.
    pub const MAX_BITSIZE: u8 = 32;

    /// Creates a generator of the specified output width, rising-edge
    /// triggered.
    pub fn new(bitsize: u8, seed: u32) -> Self {
        Self {
            bitsize: bitsize.clamp(BitArray::MIN_BITSIZE, Self::MAX_BITSIZE),
            seed,
            trigger: Trigger::default(),
        }
    }

    /// The output width in bits.
    pub fn bitsize(&self) -> u8 {
        self.bitsize
    }
    /// Changes the output width, capped at [`Self::MAX_BITSIZE`].
    pub fn set_bitsize(&mut self, bitsize: u8) {
        self.bitsize = bitsize.clamp(BitArray::MIN_BITSIZE, Self::MAX_BITSIZE);
    }
}
impl Sequential for Random {
    fn initial_state(&self) -> PrimitiveState {
        PrimitiveState::Lcg(LcgState::new(self.seed))
    }

    fn reconcile(&self, state: &mut PrimitiveState) {
        // Width is applied at output time; only the container kind matters.
        if !matches!(state, PrimitiveState::Lcg(_)) {
            *state = self.initial_state();
        }
    }

    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray> {
        self.reconcile(state);
        let PrimitiveState::Lcg(st) = state else { unreachable!() };

        let reset = st.latch_reset(inputs.reset);
        let fires = st.clock.classify(inputs.clock, self.trigger);
        if reset {
            st.reset();
        } else if fires && enabled(inputs.enable) {
            st.step();
        }
        vec![st.value(self.bitsize)]
    }
}

/// A pseudo-random generator primitive backed by the xorshift-add engine.
///
/// Same interface as [`Random`]; the underlying engine has a 128-bit state
/// and is certified never to reach the degenerate all-zero state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TinyMtRng {
    bitsize: u8,
    /// The configured seed.
    pub seed: u32,
    /// When the generator advances.
    pub trigger: Trigger,
}
impl TinyMtRng {
    /// Creates a generator of the specified output width, rising-edge
    /// triggered.
    pub fn new(bitsize: u8, seed: u32) -> Self {
        Self {
            bitsize: bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE),
            seed,
            trigger: Trigger::default(),
        }
    }

    /// The output width in bits.
    pub fn bitsize(&self) -> u8 {
        self.bitsize
    }
    /// Changes the output width.
    pub fn set_bitsize(&mut self, bitsize: u8) {
        self.bitsize = bitsize.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
    }
}
impl Sequential for TinyMtRng {
    fn initial_state(&self) -> PrimitiveState {
        PrimitiveState::TinyMt(TinyMtState::new(self.seed))
    }

    fn reconcile(&self, state: &mut PrimitiveState) {
        if !matches!(state, PrimitiveState::TinyMt(_)) {
            *state = self.initial_state();
        }
    }

    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray> {
        self.reconcile(state);
        let PrimitiveState::TinyMt(st) = state else { unreachable!() };

        let reset = st.latch_reset(inputs.reset);
        let fires = st.clock.classify(inputs.clock, self.trigger);
        if reset {
            st.reset(self.seed);
        } else if fires && enabled(inputs.enable) {
            st.step();
        }
        vec![st.value(self.bitsize)]
    }
}

#[cfg(test)]
mod test {
    use super::{Random, TinyMtRng};
    use crate::bitarray::{BitArray, BitState};
    use crate::func::{Sequential, TickInputs};
    use crate::state::PrimitiveState;

    fn cycle(f: &impl Sequential, state: &mut PrimitiveState) -> BitArray {
        let _ = f.tick(state, &TickInputs::clocked(&[], BitState::Low));
        f.tick(state, &TickInputs::clocked(&[], BitState::High))[0]
    }

    #[test]
    fn lcg_sequences_are_reproducible() {
        let rng = Random::new(16, 0xBEEF);
        let mut a = rng.initial_state();
        let mut b = rng.initial_state();
        for _ in 0..20 {
            assert_eq!(cycle(&rng, &mut a), cycle(&rng, &mut b));
        }
    }

    #[test]
    fn reset_edge_replays_the_sequence() {
        let rng = Random::new(32, 7);
        let mut st = rng.initial_state();
        let first: Vec<_> = (0..5).map(|_| cycle(&rng, &mut st)).collect();

        // Pulse reset: low, then high (the rising edge re-seeds).
        let mut inputs = TickInputs::clocked(&[], BitState::Low);
        inputs.reset = BitState::Low;
        let _ = rng.tick(&mut st, &inputs);
        inputs.reset = BitState::High;
        let _ = rng.tick(&mut st, &inputs);
        inputs.reset = BitState::Low;
        let _ = rng.tick(&mut st, &inputs);

        let replay: Vec<_> = (0..5).map(|_| cycle(&rng, &mut st)).collect();
        assert_eq!(first, replay);
    }

    #[test]
    fn held_reset_does_not_stall_forever() {
        let rng = Random::new(32, 7);
        let mut st = rng.initial_state();

        // Reset held high across several ticks only re-seeds once; clock
        // edges while it is held still advance the generator.
        let mut inputs = TickInputs::clocked(&[], BitState::Low);
        inputs.reset = BitState::Low;
        let _ = rng.tick(&mut st, &inputs);
        inputs.reset = BitState::High;
        let _ = rng.tick(&mut st, &inputs);
        let seeded = rng.tick(&mut st, &inputs.clone())[0];

        inputs.clock = BitState::High;
        let advanced = rng.tick(&mut st, &inputs)[0];
        assert_ne!(seeded, advanced);
    }

    #[test]
    fn disabled_generator_holds_its_draw() {
        let rng = TinyMtRng::new(16, 3);
        let mut st = rng.initial_state();
        let drawn = cycle(&rng, &mut st);

        let mut inputs = TickInputs::clocked(&[], BitState::Low);
        inputs.enable = BitState::Low;
        let _ = rng.tick(&mut st, &inputs);
        inputs.clock = BitState::High;
        assert_eq!(rng.tick(&mut st, &inputs)[0], drawn);
    }

    #[test]
    fn lcg_width_is_capped_at_the_draw_size() {
        assert_eq!(Random::new(64, 1).bitsize(), 32);
        let mut rng = Random::new(16, 1);
        rng.set_bitsize(48);
        assert_eq!(rng.bitsize(), 32);
    }

    #[test]
    fn tinymt_width_masks_output() {
        let rng = TinyMtRng::new(4, 9);
        let mut st = rng.initial_state();
        for _ in 0..16 {
            let out = cycle(&rng, &mut st);
            assert_eq!(out.len(), 4);
            assert!(u64::try_from(out).unwrap() < 16);
        }
    }
}
