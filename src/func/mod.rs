//! Sequential primitive definitions and their next-state functions.
//!
//! Each primitive is a small configuration struct (width, trigger policy,
//! seed, ...) implementing [`Sequential`]. The configuration is immutable
//! during a tick; all mutable data lives in the instance's
//! [`PrimitiveState`]. The [`SequentialFn`] enum dispatches over every
//! supported primitive.
//!
//! ## This module notably consists of:
//! - **[`Sequential`]**: the interface every clocked primitive implements.
//! - **[`TickInputs`]**: the input snapshot handed to one tick.
//! - **Primitive implementations**: flip-flops, registers, shift registers,
//!   counters and the two pseudo-random generators.

use crate::bitarray::{BitArray, BitState};
use crate::state::PrimitiveState;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
pub use counter::*;
pub use flipflop::*;
pub use random::*;
pub use register::*;

mod counter;
mod flipflop;
mod random;
mod register;

/// The input snapshot for one simulation tick of a primitive.
///
/// `data` carries the primitive's data inputs; its layout is documented per
/// primitive. Control lines a primitive lacks (e.g. `preset` on a counter)
/// are simply ignored.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'a> {
    /// Data inputs, layout per primitive kind.
    pub data: &'a [BitArray],
    /// The clock line value for this tick.
    pub clock: BitState,
    /// Asynchronous clear: forces the stored value to all-zero.
    pub reset: BitState,
    /// Asynchronous preset: forces the stored value to all-one.
    pub preset: BitState,
    /// Update enable. Treated as asserted unless definitely low.
    pub enable: BitState,
}
impl<'a> TickInputs<'a> {
    /// Creates an input snapshot with reset and preset deasserted and enable
    /// asserted.
    pub fn clocked(data: &'a [BitArray], clock: BitState) -> Self {
        Self {
            data,
            clock,
            reset: BitState::Low,
            preset: BitState::Low,
            enable: BitState::High,
        }
    }
}

/// The interface defining how a sequential primitive updates.
#[enum_dispatch]
pub trait Sequential {
    /// Creates the state container a fresh instance of this primitive owns.
    fn initial_state(&self) -> PrimitiveState;

    /// Brings an existing state container in line with this configuration.
    ///
    /// Called after any configuration change; a state of the wrong kind is
    /// replaced wholesale, a state of the right kind keeps as much stored
    /// data as the new configuration admits (width truncation, stage
    /// trimming, ...).
    fn reconcile(&self, state: &mut PrimitiveState);

    /// Applies one simulation tick, returning the primitive's outputs.
    ///
    /// The clock value is always recorded into the state's [`ClockState`],
    /// even when nothing else changes. Output layout is documented per
    /// primitive kind.
    ///
    /// [`ClockState`]: crate::clock::ClockState
    #[must_use]
    fn tick(&self, state: &mut PrimitiveState, inputs: &TickInputs<'_>) -> Vec<BitArray>;
}

/// An enum that represents all supported sequential primitives.
#[enum_dispatch(Sequential)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SequentialFn {
    FlipFlop,
    Register,
    ShiftRegister,
    Counter,
    Random,
    TinyMtRng,
}

/// How one tick resolves after the asynchronous lines and the clock have
/// been examined, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// Reset is asserted: force the stored value to all-zero.
    Clear,
    /// Preset is asserted (and reset is not): force the value to all-one.
    Preset,
    /// The tick does not fire: keep the stored value.
    Hold,
    /// The tick fires: apply the kind-specific transition.
    Update,
}

/// Resolves the shared priority chain: reset beats preset beats the clock.
///
/// `fires` is the [`ClockState::classify`] result for this tick, which the
/// caller must have computed already so the clock value is recorded even
/// when an asynchronous line wins.
///
/// [`ClockState::classify`]: crate::clock::ClockState::classify
fn resolve(reset: BitState, preset: BitState, fires: bool) -> Resolution {
    if reset == BitState::High {
        Resolution::Clear
    } else if preset == BitState::High {
        Resolution::Preset
    } else if !fires {
        Resolution::Hold
    } else {
        Resolution::Update
    }
}

/// Whether an enable line permits an update.
///
/// Only a definite low deasserts; unknown and error values count as enabled.
fn enabled(enable: BitState) -> bool {
    enable != BitState::Low
}
