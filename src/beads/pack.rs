/*!
  Conversion of a validated `Beads` field into a row of bytes:

  ```text
  [dcba] -> [a][b][c][d]
  ```

  Within a byte, bead `i` sits at bit `i % BEAD_SIZE`; the byte index is `i / BEAD_SIZE`.
*/

use std::fmt::{Display, Formatter};

use crate::bits::{Bit, Bits};

use super::{ValidBeads, BEADS_LENGTH, BEADS_NUMBER, BEAD_SIZE};

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct BeadRow([u8; BEADS_NUMBER]);

impl BeadRow {
  pub const ZERO: BeadRow = BeadRow([0; BEADS_NUMBER]);

  pub fn from_bytes(bytes: [u8; BEADS_NUMBER]) -> BeadRow {
    BeadRow(bytes)
  }

  pub fn bytes(&self) -> &[u8; BEADS_NUMBER] {
    &self.0
  }

  pub fn is_zero(&self) -> bool {
    self.0.iter().all(|b| *b == 0)
  }

  /// Reads bead `idx` back out of the row. `None` past `BEADS_LENGTH`.
  pub fn bit(&self, idx: usize) -> Option<bool> {
    if idx >= BEADS_LENGTH {
      return None;
    }
    Some((self.0[idx / BEAD_SIZE] >> (idx % BEAD_SIZE)) & 1 == 1)
  }

  /// The inverse of `pack`.
  pub fn to_bits(&self) -> Bits {
    Bits::from_lsb_first(
      (0..BEADS_LENGTH).map(|i| Bit::from(self.bit(i).unwrap_or(false)))
    )
  }
}

impl Display for BeadRow {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      self.0
          .iter()
          .map(|b| format!("0x{:x}", b))
          .collect::<Vec<String>>()
          .join(", ")
    )
  }
}

pub fn pack(beads: ValidBeads<'_>) -> BeadRow {
  let bits = beads.bits();
  let mut row = [0u8; BEADS_NUMBER];

  for (p, byte) in row.iter_mut().enumerate() {
    let right = BEAD_SIZE * p;
    let left  = right + BEAD_SIZE;

    for i in right..left {
      let shift = i % BEAD_SIZE;
      // Validation guarantees every position is defined.
      let value = bits.bit(i).and_then(|b| b.value()).unwrap_or(0);
      *byte |= value << shift;
    }
  }

  BeadRow(row)
}
