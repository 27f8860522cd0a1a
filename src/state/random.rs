//! Pseudo-random generator engines.
//!
//! Two deterministic engines back the random components: a 48-bit
//! linear-congruential generator ([`LcgState`]) and a 128-bit xorshift-add
//! generator ([`TinyMtState`]). Both step once per firing tick when enabled
//! and latch their reset input edge-sensitively, so a held-high reset cannot
//! re-trigger.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::bitarray::{BitArray, BitState};
use crate::clock::ClockState;

const LCG_MULTIPLIER: u64 = 0x5DEECE66D;
const LCG_ADDEND: u64 = 0xB;
const LCG_MASK: u64 = (1 << 48) - 1;

fn wall_clock_seed() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    (millis ^ LCG_MULTIPLIER) & LCG_MASK
}

/// 48-bit linear-congruential generator state.
///
/// Identical seeds produce identical output sequences. A configured seed of
/// `0` is a sentinel: the effective seed is derived from the wall clock once
/// at construction and kept for the instance's lifetime, so resets within a
/// run are reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcgState {
    init_seed: u64,
    cur_seed: u64,
    value: u32,
    last_reset: BitState,
    /// Clock transition tracking.
    pub clock: ClockState,
}
impl LcgState {
    /// Creates a generator from the configured 32-bit seed.
    pub fn new(seed: u32) -> Self {
        let init_seed = Self::resolve_seed(seed);
        Self {
            init_seed,
            cur_seed: init_seed,
            value: init_seed as u32,
            last_reset: BitState::Unk,
            clock: ClockState::new(),
        }
    }

    fn resolve_seed(seed: u32) -> u64 {
        match seed {
            0 => wall_clock_seed(),
            s => u64::from(s),
        }
    }

    /// The effective 48-bit seed resolved at construction.
    pub fn init_seed(&self) -> u64 {
        self.init_seed
    }

    /// Advances the generator one cycle.
    pub fn step(&mut self) {
        self.cur_seed = (self.cur_seed.wrapping_mul(LCG_MULTIPLIER) + LCG_ADDEND) & LCG_MASK;
        self.value = (self.cur_seed >> 12) as u32;
    }

    /// The current output, masked to `width` bits.
    pub fn value(&self, width: u8) -> BitArray {
        BitArray::from_bits(u64::from(self.value), width)
    }

    /// Records the reset input, returning whether a reset fires.
    ///
    /// A reset fires only on the false-to-true transition of the signal.
    pub fn latch_reset(&mut self, reset: BitState) -> bool {
        let old = std::mem::replace(&mut self.last_reset, reset);
        old == BitState::Low && reset == BitState::High
    }

    /// Re-applies the initial seed.
    pub fn reset(&mut self) {
        self.cur_seed = self.init_seed;
        self.value = self.init_seed as u32;
    }
}

const TINYMT_MIX: u32 = 1812433253;
// State recovery constant for the all-zero degenerate case.
const TINYMT_RECOVERY: [u32; 4] = [b'T' as u32, b'I' as u32, b'N' as u32, b'Y' as u32];

/// 128-bit xorshift-add generator state.
///
/// Initialization mixes the 32-bit seed over eight rounds, certifies the
/// period (the state is forced away from all-zero), then runs eight warm-up
/// steps. The all-zero check repeats after every step, so the generator can
/// never degenerate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TinyMtState {
    state: [u32; 4],
    last_reset: BitState,
    /// Clock transition tracking.
    pub clock: ClockState,
}
impl TinyMtState {
    /// Creates a generator from the 32-bit seed.
    pub fn new(seed: u32) -> Self {
        let mut prng = Self {
            state: Self::init_state(seed),
            last_reset: BitState::Unk,
            clock: ClockState::new(),
        };
        for _ in 0..8 {
            prng.step();
        }
        prng
    }

    fn init_state(seed: u32) -> [u32; 4] {
        let mut state = [seed, 0x8F7011EE, 0xFC78FF1F, 0x3793FDFF];
        for i in 1..8u32 {
            let prev = state[(i as usize - 1) & 3];
            state[i as usize & 3] ^=
                i.wrapping_add(TINYMT_MIX.wrapping_mul(prev ^ (prev >> 30)));
        }
        Self::certify(state)
    }

    fn certify(state: [u32; 4]) -> [u32; 4] {
        match state {
            [0, 0, 0, 0] => TINYMT_RECOVERY,
            st => st,
        }
    }

    /// The raw 128-bit state words.
    pub fn state(&self) -> [u32; 4] {
        self.state
    }

    /// Advances the generator one cycle.
    pub fn step(&mut self) {
        let [s0, s1, s2, s3] = self.state;
        let mut t0 = s0 ^ (s0 << 15);
        t0 ^= t0 >> 18;
        t0 ^= s3 << 11;
        self.state = Self::certify([s1, s2, s3, t0]);
    }

    /// The current output, masked to `width` bits.
    pub fn value(&self, width: u8) -> BitArray {
        let [s0, s1, s2, s3] = self.state.map(u64::from);
        let combined = ((s1 << 32) | s0) ^ ((s3 << 32) | s2);
        BitArray::from_bits(combined, width)
    }

    /// Records the reset input, returning whether a reset fires.
    ///
    /// A reset fires only on the false-to-true transition of the signal.
    pub fn latch_reset(&mut self, reset: BitState) -> bool {
        let old = std::mem::replace(&mut self.last_reset, reset);
        old == BitState::Low && reset == BitState::High
    }

    /// Re-derives the state from `seed` as at construction.
    pub fn reset(&mut self, seed: u32) {
        self.state = Self::init_state(seed);
        for _ in 0..8 {
            self.step();
        }
    }
}

#[cfg(test)]
mod test {
    use super::{LcgState, TinyMtState, LCG_ADDEND, LCG_MASK, LCG_MULTIPLIER};
    use crate::bitarray::BitState;

    #[test]
    fn lcg_determinism() {
        let mut a = LcgState::new(0xCAFE);
        let mut b = LcgState::new(0xCAFE);
        for _ in 0..100 {
            a.step();
            b.step();
            assert_eq!(a.value(32), b.value(32));
        }
    }

    #[test]
    fn lcg_recurrence() {
        let mut prng = LcgState::new(1);
        prng.step();
        let expected = (1u64 * LCG_MULTIPLIER + LCG_ADDEND) & LCG_MASK;
        assert_eq!(u64::try_from(prng.value(32)).unwrap(), (expected >> 12) & 0xFFFF_FFFF);
    }

    #[test]
    fn lcg_zero_seed_is_resolved_once() {
        let mut prng = LcgState::new(0);
        let derived = prng.init_seed();
        assert_ne!(derived, 0);

        // Reset returns to the derived seed, not a fresh derivation.
        for _ in 0..5 {
            prng.step();
        }
        prng.latch_reset(BitState::Low);
        assert!(prng.latch_reset(BitState::High));
        prng.reset();
        assert_eq!(prng.init_seed(), derived);

        let mut replay = prng.clone();
        prng.step();
        replay.step();
        assert_eq!(prng.value(48), replay.value(48));
    }

    #[test]
    fn reset_is_edge_latched() {
        let mut prng = LcgState::new(42);
        prng.latch_reset(BitState::Low);
        assert!(prng.latch_reset(BitState::High));
        // Held high: no further resets.
        assert!(!prng.latch_reset(BitState::High));
        assert!(!prng.latch_reset(BitState::High));
        // Must go low again before the next edge.
        assert!(!prng.latch_reset(BitState::Low));
        assert!(prng.latch_reset(BitState::High));
    }

    #[test]
    fn tinymt_never_all_zero() {
        for seed in [0u32, 1, 0xFFFF_FFFF, 0xDEAD_BEEF, 12345] {
            let mut prng = TinyMtState::new(seed);
            assert_ne!(prng.state(), [0, 0, 0, 0], "seed {seed}");
            for _ in 0..1000 {
                prng.step();
                assert_ne!(prng.state(), [0, 0, 0, 0], "seed {seed}");
            }
        }
    }

    #[test]
    fn tinymt_determinism() {
        let mut a = TinyMtState::new(7);
        let b = TinyMtState::new(7);
        assert_eq!(a.state(), b.state());
        for _ in 0..32 {
            a.step();
        }
        let mut c = TinyMtState::new(7);
        for _ in 0..32 {
            c.step();
        }
        assert_eq!(a.value(64), c.value(64));
    }

    #[test]
    fn tinymt_step_mixes_words() {
        let mut prng = TinyMtState::new(3);
        let [_, s1, s2, s3] = prng.state();
        prng.step();
        let after = prng.state();
        assert_eq!(after[0], s1);
        assert_eq!(after[1], s2);
        assert_eq!(after[2], s3);
    }
}
