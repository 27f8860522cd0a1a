//! Single-bit flip-flops (D, T, S-R and J-K).
//!
//! All four kinds share one priority chain and one state container; only the
//! next-value computation differs per kind.

use serde::{Deserialize, Serialize};

use crate::bitarray::{BitArray, BitState};
use crate::clock::Trigger;
use crate::func::{enabled, resolve, Resolution, Sequential, TickInputs};
use crate::state::{FlipFlopState, PrimitiveState};

/// The transition rule of a [`FlipFlop`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipFlopKind {
    /// Stores its data input.
    #[default]
    D,
    /// Toggles when its input is high.
    T,
    /// Set/reset inputs; asserting both is a contention error.
    Sr,
    /// Set/reset inputs; asserting both toggles.
    Jk,
}
impl FlipFlopKind {
    /// The number of data inputs this kind reads.
    pub fn data_inputs(self) -> usize {
        match self {
            FlipFlopKind::D | FlipFlopKind::T => 1,
            FlipFlopKind::Sr | FlipFlopKind::Jk => 2,
        }
    }

    /// Computes the next stored bit from the current one and the data inputs.
    ///
    /// An input that is not a definite level makes the next value unknown,
    /// except for D, which stores its input verbatim (`X` stores `X`).
    fn next(self, cur: BitState, data: &[BitArray]) -> BitState {
        use BitState::*;
        let bit = |i: usize| data.get(i).map(|b| b.index(0)).unwrap_or(Unk);
        match self {
            FlipFlopKind::D => bit(0),
            FlipFlopKind::T => {
                // An unknown stored bit acts as low for the toggle rule.
                let cur = if cur == Unk { Low } else { cur };
                match bit(0) {
                    High => !cur,
                    Low => cur,
                    _ => Unk,
                }
            }
            FlipFlopKind::Sr => match (bit(0), bit(1)) {
                (Low, Low) => cur,
                (High, Low) => High,
                (Low, High) => Low,
                (High, High) => Err,
                _ => Unk,
            },
            FlipFlopKind::Jk => match (bit(0), bit(1)) {
                (Low, Low) => cur,
                (High, Low) => High,
                (Low, High) => Low,
                (High, High) => !cur,
                _ => Unk,
            },
        }
    }
}

/// A single-bit flip-flop primitive.
///
/// Data input layout: `[d]` for D and T, `[s, r]` for S-R, `[j, k]` for J-K.
/// Outputs: `[q, q_bar]`, each one bit; `q_bar` is the negation of `q` (and
/// so also `X`/`E` when `q` is).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlipFlop {
    /// The transition rule.
    pub kind: FlipFlopKind,
    /// When the flip-flop samples its inputs.
    pub trigger: Trigger,
}
impl FlipFlop {
    /// Creates a flip-flop of the given kind with the default rising-edge
    /// trigger.
    pub fn new(kind: FlipFlopKind) -> Self {
        Self { kind, trigger: Trigger::default() }
    }
}
impl Sequential for FlipFlop {
    fn initial_state(&self) -> PrimitiveState {
        PrimitiveState::FlipFlop(FlipFlopState::new())
    }

    fn reconcile(&self, state: &mut PrimitiveState) {
        if !matches!(state, PrimitiveState::FlipFlop(_)) {
            *state = self.initial_state();
        }
    }

    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray> {
        self.reconcile(state);
        let PrimitiveState::FlipFlop(st) = state else { unreachable!() };

        let fires = st.clock.classify(inputs.clock, self.trigger);
        match resolve(inputs.reset, inputs.preset, fires) {
            Resolution::Clear => st.value = BitState::Low,
            Resolution::Preset => st.value = BitState::High,
            Resolution::Hold => {}
            Resolution::Update => {
                if enabled(inputs.enable) {
                    st.value = self.kind.next(st.value, inputs.data);
                }
            }
        }

        vec![
            BitArray::repeat(st.value, 1),
            BitArray::repeat(!st.value, 1),
        ]
    }
}
