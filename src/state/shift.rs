//! Circular-buffer storage for shift registers.

use crate::bitarr;
use crate::bitarray::BitArray;
use crate::clock::ClockState;

/// A ring of `length` stages, each `width` bits wide.
///
/// Stage `0` is the most recently pushed value, stage `length - 1` the
/// oldest. Pushing overwrites the oldest stage in O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRegisterState {
    width: u8,
    stages: Vec<BitArray>,
    cursor: usize,
    /// Clock transition tracking.
    pub clock: ClockState,
}
impl ShiftRegisterState {
    /// Creates a shift register of `length` zeroed stages, `width` bits each.
    pub fn new(width: u8, length: usize) -> Self {
        let width = width.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
        let length = length.max(1);
        Self {
            width,
            stages: vec![bitarr![0; width]; length],
            cursor: 0,
            clock: ClockState::new(),
        }
    }

    /// The width of each stage in bits.
    pub fn width(&self) -> u8 {
        self.width
    }
    /// The number of stages.
    pub fn length(&self) -> usize {
        self.stages.len()
    }

    /// The value pushed `i` steps ago (stage `0` is the most recent).
    ///
    /// Panics if `i >= length`.
    pub fn get(&self, i: usize) -> BitArray {
        let len = self.stages.len();
        assert!(i < len, "stage index out of bounds");
        // cursor points at the next slot to overwrite, i.e. the oldest stage
        self.stages[(self.cursor + len - 1 - i) % len]
    }

    /// Pushes a value, evicting the oldest stage.
    ///
    /// The value is truncated or zero-extended to the stage width.
    pub fn push(&mut self, value: BitArray) {
        self.stages[self.cursor] = value.resized(self.width, false);
        self.cursor = (self.cursor + 1) % self.stages.len();
    }

    /// Zeroes every stage.
    pub fn clear(&mut self) {
        self.stages.fill(bitarr![0; self.width]);
        self.cursor = 0;
    }

    /// Changes the stage count.
    ///
    /// The most recent `min(old, new)` values keep their relative recency;
    /// newly created stages are zero.
    pub fn set_length(&mut self, length: usize) {
        let length = length.max(1);
        if length == self.stages.len() {
            return;
        }
        let keep = length.min(self.stages.len());
        let recent: Vec<_> = (0..keep).map(|i| self.get(i)).collect();

        self.stages = vec![bitarr![0; self.width]; length];
        self.cursor = 0;
        for value in recent.into_iter().rev() {
            self.push(value);
        }
    }

    /// Changes the stage width, truncating or zero-extending every stage.
    pub fn set_width(&mut self, width: u8) {
        self.width = width.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
        for stage in &mut self.stages {
            *stage = stage.resized(self.width, false);
        }
    }
}
