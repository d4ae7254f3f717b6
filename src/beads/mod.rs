/*!

  Code beads are binary strings defined per instruction that carry target specific
  information which cannot be derived from the operand encoding. This module turns the
  `Beads` field of every instruction of a target into a row of bytes and emits the rows as
  a table indexed by opcode, together with the accessor that reads it.

  A row is `BEADS_NUMBER` bytes of `BEAD_SIZE` bits each. Bead `i` lands in byte `i / 8`
  at bit `i % 8`:

  ```text
  Beads: [ b191 ... b8 | b7 b6 b5 b4 b3 b2 b1 b0 ]
  Row:   [ byte 0 = b7..b0 ][ byte 1 = b15..b8 ] ... [ byte 23 = b191..b184 ]
  ```

  Instructions without an encoding (pseudo instructions and the reserved namespace) get a
  row of zeros. Every other instruction must define all `BEADS_LENGTH` bits; anything else
  aborts generation for the whole target.

*/

mod emit;
mod pack;
mod table;
mod validate;

pub use emit::{emit_bead_table, emit_source_file_header, EmitOptions, SOURCE_FILE_TITLE};
pub use pack::{pack, BeadRow};
pub use table::{BeadTable, RowKind, TableRow};
pub use validate::{validate, Disposition, ValidBeads};

/// Bits per bead byte.
pub const BEAD_SIZE: usize = 8;
/// Bytes per row.
pub const BEADS_NUMBER: usize = 24;
/// The required width of a `Beads` field.
pub const BEADS_LENGTH: usize = BEADS_NUMBER * BEAD_SIZE;
