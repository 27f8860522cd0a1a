//! Four-valued bit vectors used throughout the simulation and generation paths.
//!
//! A [`BitState`] is one of `0`, `1`, unknown (`X`) or error (`E`); an error
//! bit is produced by illegal input combinations (e.g. S-R contention) and is
//! ordinary data, not a fault. A [`BitArray`] is a fixed-width sequence of up
//! to 64 such bits, stored as two `u64` planes.

/// A single four-valued bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BitState {
    /// Logical false.
    Low = 0b00,
    /// Logical true.
    High = 0b01,
    /// Unknown/undefined value.
    Unk = 0b10,
    /// Error value (illegal state combination).
    Err = 0b11,
}
impl BitState {
    pub(crate) fn split(self) -> (bool /* data */, bool /* spec */) {
        ((self as u8) & 0b01 != 0, (self as u8) & 0b10 != 0)
    }
    pub(crate) fn join(data: bool, spec: bool) -> Self {
        match (data, spec) {
            (false, false) => BitState::Low,
            (true, false) => BitState::High,
            (false, true) => BitState::Unk,
            (true, true) => BitState::Err,
        }
    }

    /// Whether this bit is a defined logic level (`0` or `1`).
    pub fn is_defined(self) -> bool {
        matches!(self, BitState::Low | BitState::High)
    }
}
impl std::fmt::Display for BitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        match self {
            BitState::Low  => f.write_char('0'),
            BitState::High => f.write_char('1'),
            BitState::Unk  => f.write_char('X'),
            BitState::Err  => f.write_char('E'),
        }
    }
}

/// Error raised when converting a bit (or vector) containing `X`/`E` into a
/// two-valued form.
#[derive(Debug)]
pub struct NotTwoValuedErr(BitState);
impl NotTwoValuedErr {
    /// Whether the offending bit was unknown.
    pub fn is_unk(&self) -> bool { self.0 == BitState::Unk }
    /// Whether the offending bit was an error value.
    pub fn is_err(&self) -> bool { self.0 == BitState::Err }
    /// The offending bit state.
    pub fn bit_state(&self) -> BitState { self.0 }
}

impl TryFrom<BitState> for bool {
    type Error = NotTwoValuedErr;

    fn try_from(value: BitState) -> Result<Self, Self::Error> {
        match value {
            BitState::Low  => Ok(false),
            BitState::High => Ok(true),
            st => Err(NotTwoValuedErr(st)),
        }
    }
}
impl From<bool> for BitState {
    fn from(value: bool) -> Self {
        match value {
            true => Self::High,
            false => Self::Low,
        }
    }
}
impl std::ops::Not for BitState {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            BitState::High => Self::Low,
            BitState::Low  => Self::High,
            st => st,
        }
    }
}

/// A fixed-width vector of [`BitState`]s.
///
/// Two vectors are width-compatible only if their widths match; widening or
/// truncation is always explicit through [`BitArray::resized`].
#[derive(Default, Clone, Copy)]
pub struct BitArray {
    data: u64,
    spec: u64,
    len: u8,
}
impl BitArray {
    /// Smallest supported width.
    pub const MIN_BITSIZE: u8 = 1;
    /// Largest supported width.
    pub const MAX_BITSIZE: u8 = u64::BITS as u8;

    /// Creates an empty (zero-width) vector.
    pub fn new() -> Self {
        Default::default()
    }
    /// Creates a vector of `len` copies of `st`.
    pub fn repeat(st: BitState, len: u8) -> Self {
        let (data, spec) = st.split();
        Self {
            data: if data { u64::MAX } else { 0 },
            spec: if spec { u64::MAX } else { 0 },
            len: len.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE),
        }
    }
    /// Creates an all-unknown vector of the given width.
    pub fn unknown(len: u8) -> Self {
        Self::repeat(BitState::Unk, len)
    }
    /// Creates an all-error vector of the given width.
    pub fn error(len: u8) -> Self {
        Self::repeat(BitState::Err, len)
    }
    /// Creates a fully-defined vector from the low `len` bits of `bits`.
    pub fn from_bits(bits: u64, len: u8) -> Self {
        let len = len.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
        let arr = Self { data: bits, spec: 0, len };
        let (data, spec) = arr.normalize();
        Self { data, spec, len }
    }

    /// The declared width of this vector.
    pub const fn len(self) -> u8 {
        self.len
    }
    /// Whether this vector is zero-width.
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    const fn norm_mask(self) -> u64 {
        match self.len {
            len @ 0..64 => (1 << len) - 1,
            _ => u64::MAX,
        }
    }
    pub(crate) fn normalize(self) -> (u64, u64) {
        let mask = self.norm_mask();
        (self.data & mask, self.spec & mask)
    }

    const fn is_0(self) -> u64 {
        !self.data & !self.spec & self.norm_mask()
    }
    const fn is_1(self) -> u64 {
        self.data & !self.spec & self.norm_mask()
    }
    const fn is_e(self) -> u64 {
        self.data & self.spec & self.norm_mask()
    }

    /// Whether every bit equals `st`.
    pub fn all(self, st: BitState) -> bool {
        let (data, spec) = st.split();
        let mask = self.norm_mask();
        let (d, s) = self.normalize();
        d == if data { mask } else { 0 } && s == if spec { mask } else { 0 }
    }
    /// Whether every bit is a defined logic level.
    pub fn is_fully_defined(self) -> bool {
        let (_, spec) = self.normalize();
        spec == 0
    }
    /// Whether any bit is the error value.
    pub fn has_error(self) -> bool {
        self.is_e() != 0
    }

    fn get_raw(self, i: u8) -> BitState {
        let data = (self.data >> i) & 1 != 0;
        let spec = (self.spec >> i) & 1 != 0;
        BitState::join(data, spec)
    }
    /// Gets the bit at index `i` (LSB first), or `None` if out of bounds.
    pub fn get(self, i: u8) -> Option<BitState> {
        (i < self.len()).then(|| self.get_raw(i))
    }

    fn set_raw(&mut self, i: u8, st: BitState) {
        let (data, spec) = st.split();
        self.data &= !(1 << i);
        self.data |= u64::from(data) << i;
        self.spec &= !(1 << i);
        self.spec |= u64::from(spec) << i;
    }
    fn set(&mut self, i: u8, st: BitState) {
        if i < self.len() {
            self.set_raw(i, st);
        }
    }
    /// Returns this vector with the bit at index `i` replaced.
    pub fn with(mut self, i: u8, st: BitState) -> Self {
        self.set(i, st);
        self
    }

    /// Gets the bit at index `i`, panicking if out of bounds.
    pub fn index(self, i: u8) -> BitState {
        self.get(i).expect("index to be in bounds")
    }

    /// Returns this vector truncated or extended to `len` bits.
    ///
    /// When widening, the fill is the sign bit if `signed`, zero otherwise.
    pub fn resized(self, len: u8, signed: bool) -> Self {
        let len = len.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE);
        let fill = match signed {
            true => self.index(self.len() - 1),
            false => BitState::Low,
        };
        let (data, spec) = self.normalize();
        let mut out = Self { data, spec, len };
        for i in self.len()..len {
            out.set_raw(i, fill);
        }
        let (data, spec) = out.normalize();
        Self { data, spec, len }
    }

    /// Replaces this vector's contents, failing if the widths differ.
    pub fn replace(&mut self, new_val: BitArray) -> Result<(), MismatchedBitsizes> {
        match self.len() == new_val.len() {
            true => {
                *self = new_val;
                Ok(())
            }
            false => Err(MismatchedBitsizes {
                expected: self.len(),
                found: new_val.len(),
            }),
        }
    }
}

/// Error raised when an operation mixes two vectors of different widths.
#[derive(Debug, PartialEq, Eq)]
pub struct MismatchedBitsizes {
    /// The width that was expected.
    pub expected: u8,
    /// The width that was provided.
    pub found: u8,
}
impl std::fmt::Display for MismatchedBitsizes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected vector of width {}, found width {}", self.expected, self.found)
    }
}
impl std::error::Error for MismatchedBitsizes {}

impl FromIterator<BitState> for BitArray {
    fn from_iter<I: IntoIterator<Item = BitState>>(iter: I) -> Self {
        iter.into_iter()
            .zip(0..64)
            .fold(BitArray::new(), |mut arr, (st, i)| {
                arr.set_raw(i, st);
                arr.len += 1;
                arr
            })
    }
}
impl From<u64> for BitArray {
    fn from(data: u64) -> Self {
        Self { data, spec: 0, len: 64 }
    }
}
impl TryFrom<BitArray> for u64 {
    type Error = NotTwoValuedErr;

    fn try_from(value: BitArray) -> Result<Self, Self::Error> {
        let (data, spec) = value.normalize();
        match spec == 0 {
            true => Ok(data),
            false => {
                let err_st = match value.is_e() != 0 {
                    true => BitState::Err,
                    false => BitState::Unk,
                };
                Err(NotTwoValuedErr(err_st))
            }
        }
    }
}

/// Iterator over the bits of a [`BitArray`], LSB first.
pub struct BitArrayIntoIter(BitArray);
impl Iterator for BitArrayIntoIter {
    type Item = BitState;

    fn next(&mut self) -> Option<Self::Item> {
        (!self.0.is_empty()).then(|| {
            let raw = self.0.get_raw(0);
            self.0.data >>= 1;
            self.0.spec >>= 1;
            self.0.len -= 1;
            raw
        })
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}
impl DoubleEndedIterator for BitArrayIntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        (!self.0.is_empty()).then(|| {
            let raw = self.0.get_raw(self.0.len() - 1);
            self.0.len -= 1;
            raw
        })
    }
}
impl IntoIterator for BitArray {
    type Item = <Self::IntoIter as Iterator>::Item;
    type IntoIter = BitArrayIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        BitArrayIntoIter(self)
    }
}
impl ExactSizeIterator for BitArrayIntoIter {
    fn len(&self) -> usize {
        usize::from(self.0.len())
    }
}

impl PartialEq for BitArray {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.normalize() == other.normalize()
    }
}
impl Eq for BitArray {}
impl std::hash::Hash for BitArray {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        self.normalize().hash(state);
    }
}
impl std::fmt::Debug for BitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(*self)
            .finish()
    }
}
impl std::fmt::Display for BitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.into_iter().rev() {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

// assume same size
impl std::ops::BitAnd for BitArray {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        // 0 dominates; 1 & 1 = 1; else E if either is E, X otherwise
        let any_false = self.is_0() | rhs.is_0();
        let all_true = self.is_1() & rhs.is_1();
        let any_err = self.is_e() | rhs.is_e();

        let data = !any_false & (all_true | any_err);
        let spec = !any_false & !all_true;
        let len = self.len();
        Self { spec, data, len }
    }
}
impl std::ops::BitOr for BitArray {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        // 1 dominates; 0 | 0 = 0; else E if either is E, X otherwise
        let any_true = self.is_1() | rhs.is_1();
        let all_false = self.is_0() & rhs.is_0();
        let any_err = self.is_e() | rhs.is_e();

        let data = any_true | (!all_false & any_err);
        let spec = !any_true & !all_false;
        let len = self.len;
        Self { spec, data, len }
    }
}
impl std::ops::BitXor for BitArray {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        // defined ^ defined; else E if either is E, X otherwise
        let any_ntv = self.spec | rhs.spec;
        let any_err = self.is_e() | rhs.is_e();

        let data = (!any_ntv & (self.data ^ rhs.data)) | any_err;
        let spec = any_ntv;
        let len = self.len;
        let (data, spec) = (Self { data, spec, len }).normalize();
        Self { spec, data, len }
    }
}
impl std::ops::Not for BitArray {
    type Output = Self;

    fn not(self) -> Self::Output {
        // 0 <-> 1; X and E map to themselves
        let spec = self.spec;
        let data = (self.spec & self.data) | (!self.spec & !self.data);
        let len = self.len;
        let (data, spec) = (Self { data, spec, len }).normalize();
        Self { spec, data, len }
    }
}

/// Shorthand for constructing [`BitArray`]s.
///
/// `bitarr![0; 8]` is eight low bits, `bitarr![X; 4]` four unknown bits,
/// `bitarr![1, 0, 1]` an explicit LSB-first list.
#[macro_export]
macro_rules! bitarr {
    [0; $n:expr] => { $crate::bitarray::BitArray::repeat($crate::bitarray::BitState::Low, $n) };
    [1; $n:expr] => { $crate::bitarray::BitArray::repeat($crate::bitarray::BitState::High, $n) };
    [X; $n:expr] => { $crate::bitarray::BitArray::repeat($crate::bitarray::BitState::Unk, $n) };
    [E; $n:expr] => { $crate::bitarray::BitArray::repeat($crate::bitarray::BitState::Err, $n) };
    [0] => { $crate::bitarr![0; 1] };
    [1] => { $crate::bitarr![1; 1] };
    [X] => { $crate::bitarr![X; 1] };
    [E] => { $crate::bitarr![E; 1] };
    [$($b:tt),+ $(,)?] => {
        [$($crate::bitarr![$b]),+].into_iter()
            .map(|a| a.index(0))
            .collect::<$crate::bitarray::BitArray>()
    };
}
pub use crate::bitarr;

#[cfg(test)]
mod test {
    use super::{BitArray, BitState};
    use crate::bitarr;

    #[test]
    fn display() {
        let ba = BitArray::from_iter([
            BitState::Low,
            BitState::High,
            BitState::Unk,
            BitState::Err,
            BitState::High,
            BitState::Low,
        ]);

        assert_eq!(format!("{ba}"), "01EX10");
    }

    #[test]
    fn not_preserves_unknown_and_error() {
        let ba = BitArray::from_iter([BitState::Low, BitState::High, BitState::Unk, BitState::Err]);
        let inv = !ba;
        assert_eq!(inv.index(0), BitState::High);
        assert_eq!(inv.index(1), BitState::Low);
        assert_eq!(inv.index(2), BitState::Unk);
        assert_eq!(inv.index(3), BitState::Err);
    }

    #[test]
    fn resized_zero_and_sign() {
        let ba = BitArray::from_bits(0b101, 3);
        assert_eq!(u64::try_from(ba.resized(6, false)).unwrap(), 0b000101);
        assert_eq!(u64::try_from(ba.resized(6, true)).unwrap(), 0b111101);
        assert_eq!(u64::try_from(ba.resized(2, false)).unwrap(), 0b01);
    }

    #[test]
    fn from_bits_masks() {
        let ba = BitArray::from_bits(0xFF, 4);
        assert_eq!(u64::try_from(ba).unwrap(), 0xF);
        assert_eq!(ba.len(), 4);
    }

    #[test]
    fn replace_checks_width() {
        let mut ba = bitarr![0; 8];
        assert!(ba.replace(bitarr![1; 8]).is_ok());
        assert!(ba.replace(bitarr![1; 16]).is_err());
        assert!(ba.all(BitState::High));
    }
}
