/*!

  The catalog is the source of instruction definitions. A catalog file names one target and
  its endianness, and defines any number of instruction records:

  ```text
  target Toy {
    endianness = little;
  }

  def ADD {
    namespace = "Toy";
    bits<192> Beads = 0;
    Beads{7-0} = 0x55;
  }

  def NOP {
    isPseudo = 1;
  }
  ```

  Records are read into a `Target`, which fixes each instruction's opcode. The target is
  handed to the generator by reference and is never modified by it.

*/

mod loader;
mod opcode;
mod parser;
mod record;

pub use loader::{load_catalog, MAX_FIELD_WIDTH};
pub use opcode::OpcodeMap;
pub use record::{Endianness, Instruction, Target, DEFAULT_RESERVED_NAMESPACE};
