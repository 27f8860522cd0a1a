//! Instance registry tying primitive configurations to their owned state.
//!
//! An [`Engine`] owns any number of primitive instances, keyed by
//! [`InstanceKey`]. Each instance pairs an immutable-per-tick
//! [`SequentialFn`] configuration with the [`PrimitiveState`] it exclusively
//! owns. Ticking, state inspection, duplication and reconfiguration all go
//! through the engine.

use slotmap::{new_key_type, SlotMap};

use crate::bitarray::BitArray;
use crate::func::{Sequential, SequentialFn, TickInputs};
use crate::state::PrimitiveState;

new_key_type! {
    /// Key type for maps to primitive instances.
    pub struct InstanceKey;
}

/// One registered primitive and the state it owns.
#[derive(Debug, Clone)]
pub struct Instance {
    func: SequentialFn,
    state: PrimitiveState,
}
impl Instance {
    /// The instance's configuration.
    pub fn func(&self) -> &SequentialFn {
        &self.func
    }
    /// The instance's current state.
    pub fn state(&self) -> &PrimitiveState {
        &self.state
    }
}

/// A registry of sequential primitive instances.
#[derive(Debug, Default)]
pub struct Engine {
    instances: SlotMap<InstanceKey, Instance>,
}
impl Engine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a primitive, returning the key to its instance.
    ///
    /// The instance starts with the configuration's initial state.
    pub fn add(&mut self, func: impl Into<SequentialFn>) -> InstanceKey {
        let func = func.into();
        let state = func.initial_state();
        self.instances.insert(Instance { func, state })
    }

    /// Removes an instance, returning it if the key was live.
    pub fn remove(&mut self, key: InstanceKey) -> Option<Instance> {
        self.instances.remove(key)
    }

    /// The number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }
    /// Whether the engine has no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Gets the instance for a key.
    pub fn get(&self, key: InstanceKey) -> Option<&Instance> {
        self.instances.get(key)
    }
    /// Gets an instance's current state.
    pub fn state(&self, key: InstanceKey) -> Option<&PrimitiveState> {
        self.get(key).map(Instance::state)
    }

    /// Replaces an instance's state, reconciling it against the
    /// configuration first.
    ///
    /// Returns `false` (leaving the engine untouched) if the key is dead.
    pub fn set_state(&mut self, key: InstanceKey, mut state: PrimitiveState) -> bool {
        let Some(inst) = self.instances.get_mut(key) else { return false };
        inst.func.reconcile(&mut state);
        inst.state = state;
        true
    }

    /// Deep-copies an instance's state.
    ///
    /// The copy is fully independent of the instance; mutating one never
    /// affects the other.
    pub fn clone_state(&self, key: InstanceKey) -> Option<PrimitiveState> {
        self.state(key).cloned()
    }

    /// Registers a new instance with the same configuration and a deep copy
    /// of the state of an existing one.
    pub fn duplicate(&mut self, key: InstanceKey) -> Option<InstanceKey> {
        let copy = self.instances.get(key)?.clone();
        Some(self.instances.insert(copy))
    }

    /// Applies one simulation tick to an instance, returning its outputs.
    ///
    /// Returns `None` if the key is dead.
    pub fn tick(&mut self, key: InstanceKey, inputs: &TickInputs<'_>) -> Option<Vec<BitArray>> {
        let inst = self.instances.get_mut(key)?;
        Some(inst.func.tick(&mut inst.state, inputs))
    }

    /// Edits an instance's configuration, then reconciles its state.
    ///
    /// All width, length, maximum, trigger and policy changes go through
    /// here so the owned state can never drift out of line with the
    /// configuration. Returns `false` if the key is dead.
    pub fn reconfigure(&mut self, key: InstanceKey, edit: impl FnOnce(&mut SequentialFn)) -> bool {
        let Some(inst) = self.instances.get_mut(key) else { return false };
        edit(&mut inst.func);
        inst.func.reconcile(&mut inst.state);
        log::debug!("reconfigured instance {key:?}");
        true
    }
}

#[cfg(test)]
mod test {
    use super::Engine;
    use crate::bitarr;
    use crate::bitarray::{BitArray, BitState};
    use crate::func::{Register, Sequential, SequentialFn, TickInputs};
    use crate::state::PrimitiveState;

    fn store(engine: &mut Engine, key: super::InstanceKey, value: BitArray) {
        let data = [value];
        let _ = engine.tick(key, &TickInputs::clocked(&data, BitState::Low));
        let _ = engine.tick(key, &TickInputs::clocked(&data, BitState::High));
    }

    #[test]
    fn duplicate_does_not_share_state() {
        let mut engine = Engine::new();
        let a = engine.add(Register::new(8));
        store(&mut engine, a, BitArray::from_bits(0x42, 8));

        let b = engine.duplicate(a).unwrap();
        store(&mut engine, a, BitArray::from_bits(0x99, 8));

        let out = engine
            .tick(b, &TickInputs::clocked(&[bitarr![0; 8]], BitState::Low))
            .unwrap();
        assert_eq!(out[0], BitArray::from_bits(0x42, 8));
    }

    #[test]
    fn set_state_reconciles_against_config() {
        let mut engine = Engine::new();
        let key = engine.add(Register::new(4));

        // A wider state snapshot gets truncated to the configured width.
        let mut snapshot = Register::new(8).initial_state();
        if let PrimitiveState::Register(reg) = &mut snapshot {
            reg.value = bitarr![1; 8];
        }
        assert!(engine.set_state(key, snapshot));

        let PrimitiveState::Register(reg) = engine.state(key).unwrap() else {
            panic!("expected register state")
        };
        assert_eq!(reg.value, bitarr![1; 4]);
    }

    #[test]
    fn reconfigure_reconciles_immediately() {
        let mut engine = Engine::new();
        let key = engine.add(Register::new(8));
        store(&mut engine, key, bitarr![1; 8]);

        engine.reconfigure(key, |func| {
            if let SequentialFn::Register(reg) = func {
                reg.set_bitsize(4);
            }
        });
        let PrimitiveState::Register(reg) = engine.state(key).unwrap() else {
            panic!("expected register state")
        };
        assert_eq!(reg.value, bitarr![1; 4]);
    }

    #[test]
    fn dead_keys_are_rejected() {
        let mut engine = Engine::new();
        let key = engine.add(Register::new(8));
        engine.remove(key).unwrap();

        assert!(engine.state(key).is_none());
        assert!(engine.tick(key, &TickInputs::clocked(&[], BitState::Low)).is_none());
        assert!(!engine.set_state(key, Register::new(8).initial_state()));
        assert!(engine.is_empty());
    }
}
