/*!
  Bit vectors whose positions are individually either a concrete value or undefined. Both
  `Beads` and `Inst` fields of an instruction record are stored as `Bits`.

  Position 0 is the least significant bit. The textual form lists bits most significant
  first, as a record file does: `{ 1, 0, ? }` has `bit(0) == Undefined` and
  `bit(2) == Defined(One)`.
*/

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(
TryFromPrimitive, IntoPrimitive,
Clone,            Copy,          Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum BitValue {
  Zero = 0,
  One  = 1
}

impl From<bool> for BitValue {
  fn from(value: bool) -> BitValue {
    match value {
      true  => BitValue::One,
      false => BitValue::Zero
    }
  }
}

/// A single bit position of a `Bits` vector.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Bit {
  Defined(BitValue),
  Undefined
}

impl Bit {
  pub const ZERO: Bit = Bit::Defined(BitValue::Zero);
  pub const ONE : Bit = Bit::Defined(BitValue::One);

  /// Parses one of `0`, `1`, or `?`.
  pub fn from_char(c: char) -> Option<Bit> {
    match c {
      '?' => Some(Bit::Undefined),
      c   => c.to_digit(2)
              .and_then(|d| BitValue::try_from(d as u8).ok())
              .map(Bit::Defined)
    }
  }

  pub fn is_defined(&self) -> bool {
    match self {
      Bit::Defined(_) => true,
      Bit::Undefined  => false
    }
  }

  /// The concrete value as a number, or `None` if undefined.
  pub fn value(&self) -> Option<u8> {
    match self {
      Bit::Defined(v) => Some(Into::<u8>::into(*v)),
      Bit::Undefined  => None
    }
  }
}

impl From<bool> for Bit {
  fn from(value: bool) -> Bit {
    Bit::Defined(BitValue::from(value))
  }
}

impl Display for Bit {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.value() {
      Some(v) => write!(f, "{}", v),
      None    => write!(f, "?")
    }
  }
}


#[derive(Clone, Eq, PartialEq, Debug, Hash, Default)]
pub struct Bits {
  bits: Vec<Bit>
}

impl Bits {

  /// A vector of `width` undefined bits, as produced by a bare `bits<N>` declaration.
  pub fn undefined(width: usize) -> Bits {
    Bits{ bits: vec![Bit::Undefined; width] }
  }

  pub fn zeros(width: usize) -> Bits {
    Bits{ bits: vec![Bit::ZERO; width] }
  }

  /// Builds a vector from bits listed least significant first.
  pub fn from_lsb_first<I>(bits: I) -> Bits
    where I: IntoIterator<Item = Bit>
  {
    Bits{ bits: bits.into_iter().collect() }
  }

  /// Builds a vector from bits listed most significant first, the textual order.
  pub fn from_msb_first<I>(bits: I) -> Bits
    where I: IntoIterator<Item = Bit>
  {
    let mut bits: Vec<Bit> = bits.into_iter().collect();
    bits.reverse();
    Bits{ bits }
  }

  /// The low `width` bits of `value`. Higher set bits of `value` are ignored.
  pub fn from_u128(value: u128, width: usize) -> Bits {
    Bits::from_lsb_first(
      (0..width).map(|i| Bit::from(i < 128 && (value >> i) & 1 == 1))
    )
  }

  pub fn num_bits(&self) -> usize {
    self.bits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bits.is_empty()
  }

  /// True if every position carries a concrete value.
  pub fn is_complete(&self) -> bool {
    self.bits.iter().all(Bit::is_defined)
  }

  pub fn first_undefined(&self) -> Option<usize> {
    self.bits.iter().position(|b| !b.is_defined())
  }

  /// Returns `None` for positions beyond the declared width.
  pub fn bit(&self, idx: usize) -> Option<Bit> {
    self.bits.get(idx).copied()
  }

  /// Returns false if `idx` is out of range.
  pub fn set(&mut self, idx: usize, bit: Bit) -> bool {
    match self.bits.get_mut(idx) {
      Some(slot) => {
        *slot = bit;
        true
      }
      None => false
    }
  }

  /**
    Overwrites positions `low..low + value.num_bits()` with `value`. Returns false without
    modifying anything if the slice does not fit.
  */
  pub fn assign_slice(&mut self, low: usize, value: &Bits) -> bool {
    if low + value.num_bits() > self.num_bits() {
      return false;
    }
    self.bits[low..low + value.num_bits()].copy_from_slice(&value.bits);
    true
  }

  /// Reverses the bit order in place: position `i` moves to `num_bits() - 1 - i`.
  pub fn reverse(&mut self) {
    self.bits.reverse();
  }

  /// Number of defined bits equal to one.
  pub fn count_ones(&self) -> usize {
    self.bits.iter().filter(|b| **b == Bit::ONE).count()
  }

}

impl Display for Bits {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{{ {} }}",
      self.bits
          .iter()
          .rev()
          .map(Bit::to_string)
          .collect::<Vec<String>>()
          .join(", ")
    )
  }
}
