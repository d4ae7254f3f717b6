use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;
use strum_macros::{Display as StrumDisplay, EnumString};
use tracing::debug;

use super::OpcodeMap;
use crate::bits::Bits;
use crate::error::CatalogError;
use crate::location::SourceLocation;

/// Namespace of the target-independent opcodes that have no encoding of their own.
pub const DEFAULT_RESERVED_NAMESPACE: &str = "TargetOpcode";

/// Bit order of instruction encodings.
#[derive(
StrumDisplay, EnumString,
Clone,        Copy,       Eq, PartialEq, Debug, Hash
)]
pub enum Endianness {
  #[strum(serialize = "little")]
  Little,
  #[strum(serialize = "big")]
  Big
}

impl Default for Endianness {
  fn default() -> Endianness {
    Endianness::Big
  }
}

/**
  One instruction definition. Records are immutable once the `Target` that owns them has
  been built; the generator only ever reads them.
*/
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
  pub name      : DefaultAtom,
  pub namespace : DefaultAtom,
  pub is_pseudo : bool,
  /// `None` if the record never declared a `Beads` field.
  pub beads     : Option<Bits>,
  /// The operand encoding. Only endianness normalization touches it.
  pub inst      : Option<Bits>,
  pub loc       : SourceLocation
}

impl Instruction {

  pub fn new(name: &str, namespace: &str) -> Instruction {
    Instruction{
      name      : DefaultAtom::from(name),
      namespace : DefaultAtom::from(namespace),
      is_pseudo : false,
      beads     : None,
      inst      : None,
      loc       : SourceLocation::builtin()
    }
  }

  pub fn with_beads(mut self, beads: Bits) -> Instruction {
    self.beads = Some(beads);
    self
  }

  pub fn with_inst(mut self, inst: Bits) -> Instruction {
    self.inst = Some(inst);
    self
  }

  pub fn pseudo(mut self) -> Instruction {
    self.is_pseudo = true;
    self
  }

  pub fn at(mut self, loc: SourceLocation) -> Instruction {
    self.loc = loc;
    self
  }

  /// Pseudo instructions and those in the reserved namespace have no encoding.
  pub fn has_encoding(&self, reserved_namespace: &str) -> bool {
    !(self.is_pseudo || &*self.namespace == reserved_namespace)
  }

}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}::{}", self.namespace, self.name)
  }
}


/**
  A target and its instructions in opcode order. The position of an instruction in
  `instructions_by_enum_value()` is its opcode.

  Opcode order puts every reserved-namespace instruction first, in the order they were
  given, followed by all other instructions sorted by name.
*/
#[derive(Clone, Debug)]
pub struct Target {
  name               : DefaultAtom,
  endianness         : Endianness,
  reserved_namespace : DefaultAtom,
  instructions       : Vec<Instruction>,
  opcodes            : OpcodeMap,
  normalized         : bool
}

impl Target {

  pub fn new(
      name               : &str,
      endianness         : Endianness,
      reserved_namespace : &str,
      instructions       : Vec<Instruction>
    ) -> Result<Target, CatalogError>
  {
    let (mut instructions, mut rest): (Vec<Instruction>, Vec<Instruction>) =
      instructions
        .into_iter()
        .partition(|i| &*i.namespace == reserved_namespace);
    rest.sort_by(|a, b| (*a.name).cmp(&*b.name));
    instructions.append(&mut rest);

    let mut opcodes = OpcodeMap::new();
    for (opcode, instruction) in instructions.iter().enumerate() {
      if opcodes.insert(instruction.name.clone(), opcode).is_err() {
        return Err(CatalogError::DuplicateRecord {
          name : instruction.name.clone(),
          loc  : instruction.loc.clone()
        });
      }
    }

    debug!(target_name = name, count = instructions.len(), "enumerated instructions");

    Ok(Target{
      name               : DefaultAtom::from(name),
      endianness,
      reserved_namespace : DefaultAtom::from(reserved_namespace),
      instructions,
      opcodes,
      normalized         : false
    })
  }

  pub fn name(&self) -> &DefaultAtom {
    &self.name
  }

  pub fn endianness(&self) -> Endianness {
    self.endianness
  }

  pub fn reserved_namespace(&self) -> &DefaultAtom {
    &self.reserved_namespace
  }

  pub fn instructions_by_enum_value(&self) -> &[Instruction] {
    &self.instructions
  }

  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }

  pub fn instruction(&self, opcode: usize) -> Option<&Instruction> {
    self.instructions.get(opcode)
  }

  pub fn opcode_of(&self, name: &str) -> Option<usize> {
    self.opcodes.opcode_of(name)
  }

  pub fn name_of(&self, opcode: usize) -> Option<&DefaultAtom> {
    self.opcodes.name_of(opcode)
  }

  pub fn is_normalized(&self) -> bool {
    self.normalized
  }

  /**
    For little-endian encodings, reverses the bit order of the `Inst` field of every
    instruction that has an encoding. Beads are authored in their final order and are left
    alone. Calling this more than once has no further effect.
  */
  pub fn normalize_endianness(&mut self) {
    if self.normalized {
      return;
    }
    self.normalized = true;

    if self.endianness != Endianness::Little {
      return;
    }

    let reserved = self.reserved_namespace.clone();
    for instruction in self.instructions.iter_mut() {
      if !instruction.has_encoding(&reserved) {
        continue;
      }
      if let Some(inst) = instruction.inst.as_mut() {
        inst.reverse();
      }
    }
    debug!(target_name = %self.name, "reversed encoding bits for little-endian target");
  }

}
